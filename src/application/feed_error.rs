// Errors raised at the feed boundary
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {message}")]
    Malformed { url: String, message: String },

    /// The upstream answered but reported an error in place of data.
    #[error("feature service error {code}: {message}")]
    Service { code: i64, message: String },
}

impl FeedError {
    /// Failures a feed may recover from locally by reporting no data.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FeedError::Service { .. })
    }
}
