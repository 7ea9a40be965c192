// Hurricane update cycle - fetch, process, publish
use crate::application::feed_error::FeedError;
use crate::application::hurricane_feed::HurricaneFeed;
use crate::application::poller::Refresh;
use crate::application::snapshot_channel::SnapshotWriter;
use crate::application::storm_processor::{assemble_cones, build_secondary_segments, process_storms};
use crate::domain::snapshot::HurricaneSnapshot;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

pub struct HurricaneService {
    feed: Arc<dyn HurricaneFeed>,
    writer: SnapshotWriter<HurricaneSnapshot>,
}

impl HurricaneService {
    pub fn new(feed: Arc<dyn HurricaneFeed>, writer: SnapshotWriter<HurricaneSnapshot>) -> Self {
        Self { feed, writer }
    }

    /// Run one cycle. On failure the previous data stays published with `error` set; the next
    /// successful cycle clears it.
    pub async fn run_cycle(&self) -> Result<(), FeedError> {
        match self.fetch_and_process().await {
            Ok(snapshot) => {
                info!(
                    storms = snapshot.processed_storms.len(),
                    positions = snapshot.positions.len(),
                    cones = snapshot.cones.len(),
                    "Published hurricane snapshot"
                );
                self.writer.publish(snapshot);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Hurricane cycle failed, keeping previous data");
                let stale = self.writer.current().with_error(e.to_string());
                self.writer.publish(stale);
                Err(e)
            }
        }
    }

    async fn fetch_and_process(&self) -> Result<HurricaneSnapshot, FeedError> {
        let (positions, cones, secondary) = futures::try_join!(
            self.feed.fetch_positions(),
            self.feed.fetch_cones(),
            self.feed.fetch_secondary_forecast(),
        )?;

        let cones = assemble_cones(&cones);
        let processed_storms = process_storms(&positions, &cones);
        let secondary_forecast_segments = build_secondary_segments(&secondary);

        Ok(HurricaneSnapshot {
            positions,
            cones,
            processed_storms,
            secondary_forecast_segments,
            updated_at: Some(Utc::now()),
            error: None,
        })
    }
}

#[async_trait]
impl Refresh for HurricaneService {
    fn name(&self) -> &'static str {
        "hurricanes"
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        Ok(self.run_cycle().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::snapshot_channel::{snapshot_channel, SnapshotReader};
    use crate::domain::storm::{RawPosition, TrajectoryCone};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeFeed {
        positions: Mutex<Vec<RawPosition>>,
        cones: Mutex<Vec<TrajectoryCone>>,
        fail: Mutex<bool>,
    }

    #[async_trait]
    impl HurricaneFeed for FakeFeed {
        async fn fetch_positions(&self) -> Result<Vec<RawPosition>, FeedError> {
            if *self.fail.lock().unwrap() {
                return Err(FeedError::Service {
                    code: 400,
                    message: "Invalid query".to_string(),
                });
            }
            Ok(self.positions.lock().unwrap().clone())
        }

        async fn fetch_cones(&self) -> Result<Vec<TrajectoryCone>, FeedError> {
            Ok(self.cones.lock().unwrap().clone())
        }

        async fn fetch_secondary_forecast(&self) -> Result<Vec<RawPosition>, FeedError> {
            Ok(Vec::new())
        }
    }

    fn fix(id: &str, hour: i64, lon: f64) -> RawPosition {
        RawPosition {
            storm_id: id.to_string(),
            storm_name: "KIRK".to_string(),
            basin: "AL".to_string(),
            position: [lon, 18.0],
            category: Some(2.0),
            wind_knots: Some(90.0),
            pressure_mb: Some(970.0),
            forecast_hour: 0,
            timestamp_ms: Some(hour * 3_600_000),
        }
    }

    fn service(feed: Arc<FakeFeed>) -> (HurricaneService, SnapshotReader<HurricaneSnapshot>) {
        let (writer, reader) = snapshot_channel(HurricaneSnapshot::default());
        (HurricaneService::new(feed, writer), reader)
    }

    #[tokio::test]
    async fn test_empty_feed_publishes_empty_snapshot() {
        let (service, reader) = service(Arc::new(FakeFeed::default()));

        service.run_cycle().await.unwrap();

        let snapshot = reader.current();
        assert!(snapshot.processed_storms.is_empty());
        assert!(snapshot.error.is_none());
        assert!(snapshot.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_missing_cones_is_not_an_error() {
        let feed = Arc::new(FakeFeed::default());
        *feed.positions.lock().unwrap() = vec![fix("AL122024", 1, -40.0), fix("AL122024", 2, -41.0)];
        let (service, reader) = service(feed);

        service.run_cycle().await.unwrap();

        let snapshot = reader.current();
        assert_eq!(snapshot.processed_storms.len(), 1);
        assert_eq!(snapshot.processed_storms[0].colored_track_segments.len(), 1);
        assert!(snapshot.cones.is_empty());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_data_until_next_success() {
        let feed = Arc::new(FakeFeed::default());
        *feed.positions.lock().unwrap() = vec![fix("AL122024", 1, -40.0)];
        let (service, reader) = service(feed.clone());

        service.run_cycle().await.unwrap();
        let first = reader.current();

        *feed.fail.lock().unwrap() = true;
        assert!(service.run_cycle().await.is_err());

        let stale = reader.current();
        assert_eq!(stale.processed_storms, first.processed_storms);
        assert_eq!(stale.updated_at, first.updated_at);
        assert!(stale.error.as_deref().unwrap().contains("Invalid query"));

        *feed.fail.lock().unwrap() = false;
        service.run_cycle().await.unwrap();
        assert!(reader.current().error.is_none());
    }
}
