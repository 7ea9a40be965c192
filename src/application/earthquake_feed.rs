// Port for the seismic event feed
use crate::application::feed_error::FeedError;
use crate::domain::earthquake::Earthquake;
use async_trait::async_trait;

#[async_trait]
pub trait EarthquakeFeed: Send + Sync {
    async fn fetch_earthquakes(&self) -> Result<Vec<Earthquake>, FeedError>;
}
