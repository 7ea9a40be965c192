// wheretheiss.at client for the orbital position feed
use crate::application::feed_error::FeedError;
use crate::application::orbit_feed::OrbitFeed;
use crate::domain::geo::is_valid_coordinate;
use crate::domain::orbit::OrbitalPosition;
use crate::infrastructure::http_fetch::get_json;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

// The positions endpoint rejects more timestamps than this per call.
const MAX_TIMESTAMPS_PER_REQUEST: usize = 10;

#[derive(Debug, Clone)]
pub struct IssClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SatellitePosition {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    altitude: f64,
    #[serde(default)]
    velocity: f64,
    timestamp: i64,
}

impl IssClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn positions_url(&self, timestamps: &[i64]) -> String {
        let joined = timestamps
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/positions?timestamps={}&units=kilometers",
            self.base_url,
            urlencoding::encode(&joined)
        )
    }
}

fn to_domain(url: &str, position: SatellitePosition) -> Result<OrbitalPosition, FeedError> {
    if !is_valid_coordinate(position.longitude, position.latitude) {
        return Err(FeedError::Malformed {
            url: url.to_string(),
            message: format!(
                "position out of range: {}, {}",
                position.longitude, position.latitude
            ),
        });
    }

    Ok(OrbitalPosition {
        timestamp: position.timestamp,
        position: [position.longitude, position.latitude],
        altitude_km: position.altitude,
        velocity_kmh: position.velocity,
    })
}

/// Samples that fail to decode or fall out of range are dropped; the rest of the batch stands.
fn batch_to_domain(url: &str, samples: Vec<Value>) -> Vec<OrbitalPosition> {
    let total = samples.len();
    let positions: Vec<OrbitalPosition> = samples
        .into_iter()
        .filter_map(|sample| serde_json::from_value::<SatellitePosition>(sample).ok())
        .filter_map(|sample| to_domain(url, sample).ok())
        .collect();

    if positions.len() < total {
        debug!(dropped = total - positions.len(), "Dropped invalid orbit samples");
    }
    positions
}

#[async_trait]
impl OrbitFeed for IssClient {
    async fn current_position(&self) -> Result<OrbitalPosition, FeedError> {
        let position: SatellitePosition = get_json(&self.client, &self.base_url).await?;
        to_domain(&self.base_url, position)
    }

    async fn positions_at(&self, timestamps: &[i64]) -> Result<Vec<OrbitalPosition>, FeedError> {
        if timestamps.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.positions_url(timestamps);
        let samples: Vec<Value> = get_json(&self.client, &url).await?;
        Ok(batch_to_domain(&url, samples))
    }

    fn max_batch(&self) -> usize {
        MAX_TIMESTAMPS_PER_REQUEST
    }
}
