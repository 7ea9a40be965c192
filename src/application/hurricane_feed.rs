// Port for the hurricane feature service
use crate::application::feed_error::FeedError;
use crate::domain::storm::{RawPosition, TrajectoryCone};
use async_trait::async_trait;

/// An empty list is a valid answer from every method; the collector feed is sometimes empty.
#[async_trait]
pub trait HurricaneFeed: Send + Sync {
    /// Observed and forecast fixes for every active storm
    async fn fetch_positions(&self) -> Result<Vec<RawPosition>, FeedError>;

    /// Uncertainty cones, from the first candidate layer that has any
    async fn fetch_cones(&self) -> Result<Vec<TrajectoryCone>, FeedError>;

    /// Independent forecast feed whose category field is trusted as-is
    async fn fetch_secondary_forecast(&self) -> Result<Vec<RawPosition>, FeedError>;
}
