// Port for the orbital position API
use crate::application::feed_error::FeedError;
use crate::domain::orbit::OrbitalPosition;
use async_trait::async_trait;

#[async_trait]
pub trait OrbitFeed: Send + Sync {
    async fn current_position(&self) -> Result<OrbitalPosition, FeedError>;

    /// Positions at explicit Unix timestamps; callers respect `max_batch`.
    async fn positions_at(&self, timestamps: &[i64]) -> Result<Vec<OrbitalPosition>, FeedError>;

    fn max_batch(&self) -> usize;
}
