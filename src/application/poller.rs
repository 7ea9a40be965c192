// Fixed-interval polling of feed services
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// One update cycle of a feed service.
#[async_trait]
pub trait Refresh: Send + Sync {
    fn name(&self) -> &'static str;

    async fn refresh(&self) -> anyhow::Result<()>;
}

/// Run `task` every `period` until shutdown. A cycle finishes before the next tick is taken, so
/// cycles never overlap; ticks missed while a slow cycle runs are skipped, not queued.
pub async fn run_forever(
    task: Arc<dyn Refresh>,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(feed = task.name(), period_secs = period.as_secs(), "Starting poller");

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                info!(feed = task.name(), "Shutting down poller");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = task.refresh().await {
                    error!(feed = task.name(), error = %e, "Update cycle failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        cycles: AtomicUsize,
    }

    #[async_trait]
    impl Refresh for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        async fn refresh(&self) -> anyhow::Result<()> {
            self.cycles.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("failures do not stop the poller")
        }
    }

    #[tokio::test]
    async fn test_polls_until_shutdown() {
        let counter = Arc::new(Counter {
            cycles: AtomicUsize::new(0),
        });
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(run_forever(
            counter.clone(),
            Duration::from_millis(10),
            shutdown_rx,
        ));

        tokio::time::sleep(Duration::from_millis(55)).await;
        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();

        assert!(counter.cycles.load(Ordering::SeqCst) >= 2);
    }
}
