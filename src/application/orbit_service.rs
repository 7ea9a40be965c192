// Orbital track update cycle
use crate::application::feed_error::FeedError;
use crate::application::orbit_feed::OrbitFeed;
use crate::application::poller::Refresh;
use crate::application::snapshot_channel::SnapshotWriter;
use crate::domain::geo::{split_on_dateline, LonLat};
use crate::domain::orbit::{OrbitTrack, OrbitalPosition};
use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct OrbitService {
    feed: Arc<dyn OrbitFeed>,
    writer: SnapshotWriter<OrbitTrack>,
    window_secs: i64,
    step_secs: i64,
}

/// Sample times from `now - window` to `now + window` inclusive.
pub fn trajectory_timestamps(now: i64, window_secs: i64, step_secs: i64) -> Vec<i64> {
    let step = step_secs.max(1) as usize;
    (now - window_secs..=now + window_secs).step_by(step).collect()
}

impl OrbitService {
    pub fn new(
        feed: Arc<dyn OrbitFeed>,
        writer: SnapshotWriter<OrbitTrack>,
        window_minutes: u32,
        step_secs: u32,
    ) -> Self {
        Self {
            feed,
            writer,
            window_secs: i64::from(window_minutes) * 60,
            step_secs: i64::from(step_secs),
        }
    }

    pub async fn run_cycle(&self) -> Result<(), FeedError> {
        match self.build_track().await {
            Ok(track) => {
                debug!(segments = track.path.len(), "Published orbit track");
                self.writer.publish(track);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Orbit cycle failed, keeping previous track");
                let stale = self.writer.current().with_error(e.to_string());
                self.writer.publish(stale);
                Err(e)
            }
        }
    }

    async fn build_track(&self) -> Result<OrbitTrack, FeedError> {
        let current = self.feed.current_position().await?;
        let timestamps = trajectory_timestamps(current.timestamp, self.window_secs, self.step_secs);

        let batches = timestamps
            .chunks(self.feed.max_batch().max(1))
            .map(|batch| self.feed.positions_at(batch));
        let mut positions: Vec<OrbitalPosition> =
            try_join_all(batches).await?.into_iter().flatten().collect();

        positions.sort_by_key(|p| p.timestamp);
        positions.dedup_by_key(|p| p.timestamp);

        let points: Vec<LonLat> = positions.iter().map(|p| p.position).collect();

        Ok(OrbitTrack {
            current: Some(current),
            path: split_on_dateline(&points),
            updated_at: Some(Utc::now()),
            error: None,
        })
    }
}

#[async_trait]
impl Refresh for OrbitService {
    fn name(&self) -> &'static str {
        "orbit"
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        Ok(self.run_cycle().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::snapshot_channel::snapshot_channel;
    use std::sync::Mutex;

    // Ground track moving 4° east per minute
    struct LinearOrbit {
        requests: Mutex<Vec<usize>>,
    }

    fn at(timestamp: i64) -> OrbitalPosition {
        let lon = ((timestamp / 60) as f64 * 4.0 + 180.0).rem_euclid(360.0) - 180.0;
        OrbitalPosition {
            timestamp,
            position: [lon, 0.0],
            altitude_km: 420.0,
            velocity_kmh: 27_600.0,
        }
    }

    #[async_trait]
    impl OrbitFeed for LinearOrbit {
        async fn current_position(&self) -> Result<OrbitalPosition, FeedError> {
            Ok(at(0))
        }

        async fn positions_at(&self, timestamps: &[i64]) -> Result<Vec<OrbitalPosition>, FeedError> {
            self.requests.lock().unwrap().push(timestamps.len());
            Ok(timestamps.iter().rev().map(|t| at(*t)).collect())
        }

        fn max_batch(&self) -> usize {
            10
        }
    }

    #[test]
    fn test_trajectory_timestamps_are_inclusive() {
        let timestamps = trajectory_timestamps(1000, 120, 60);
        assert_eq!(timestamps, vec![880, 940, 1000, 1060, 1120]);
    }

    #[tokio::test]
    async fn test_track_is_batched_and_split() {
        let feed = Arc::new(LinearOrbit {
            requests: Mutex::new(Vec::new()),
        });
        let (writer, reader) = snapshot_channel(OrbitTrack::default());
        let service = OrbitService::new(feed.clone(), writer, 45, 60);

        service.run_cycle().await.unwrap();

        // 91 samples in batches of at most 10
        let requests = feed.requests.lock().unwrap().clone();
        assert_eq!(requests.iter().sum::<usize>(), 91);
        assert!(requests.iter().all(|n| *n <= 10));

        let track = reader.current();
        assert_eq!(track.current.as_ref().unwrap().timestamp, 0);
        assert!(track.path.len() >= 2);
        for segment in &track.path {
            assert!(segment.windows(2).all(|w| (w[1][0] - w[0][0]).abs() <= 180.0));
        }
    }
}
