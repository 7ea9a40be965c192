// Earthquake update cycle
use crate::application::earthquake_feed::EarthquakeFeed;
use crate::application::poller::Refresh;
use crate::application::snapshot_channel::SnapshotWriter;
use crate::domain::snapshot::EarthquakeSnapshot;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

pub struct EarthquakeService {
    feed: Arc<dyn EarthquakeFeed>,
    writer: SnapshotWriter<EarthquakeSnapshot>,
}

impl EarthquakeService {
    pub fn new(feed: Arc<dyn EarthquakeFeed>, writer: SnapshotWriter<EarthquakeSnapshot>) -> Self {
        Self { feed, writer }
    }
}

#[async_trait]
impl Refresh for EarthquakeService {
    fn name(&self) -> &'static str {
        "earthquakes"
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        match self.feed.fetch_earthquakes().await {
            Ok(mut earthquakes) => {
                earthquakes.sort_by(|a, b| a.magnitude.total_cmp(&b.magnitude));
                self.writer.publish(EarthquakeSnapshot {
                    earthquakes,
                    updated_at: Some(Utc::now()),
                    error: None,
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Earthquake cycle failed, keeping previous data");
                let stale = self.writer.current().with_error(e.to_string());
                self.writer.publish(stale);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::feed_error::FeedError;
    use crate::application::snapshot_channel::snapshot_channel;
    use crate::domain::earthquake::Earthquake;

    struct StaticFeed(Vec<f64>);

    #[async_trait]
    impl EarthquakeFeed for StaticFeed {
        async fn fetch_earthquakes(&self) -> Result<Vec<Earthquake>, FeedError> {
            Ok(self
                .0
                .iter()
                .enumerate()
                .map(|(i, magnitude)| Earthquake {
                    id: format!("eq{}", i),
                    magnitude: *magnitude,
                    place: "Offshore".to_string(),
                    time_ms: 0,
                    position: [0.0, 0.0],
                    depth_km: 5.0,
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_largest_events_draw_last() {
        let (writer, reader) = snapshot_channel(EarthquakeSnapshot::default());
        let service = EarthquakeService::new(Arc::new(StaticFeed(vec![5.1, 2.5, 6.3])), writer);

        service.refresh().await.unwrap();

        let magnitudes: Vec<f64> = reader.current().earthquakes.iter().map(|e| e.magnitude).collect();
        assert_eq!(magnitudes, vec![2.5, 5.1, 6.3]);
    }
}
