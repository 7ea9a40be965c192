// Orbital position domain models
use super::geo::{LonLat, PathSegmentSet};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitalPosition {
    /// Unix seconds.
    pub timestamp: i64,
    pub position: LonLat,
    pub altitude_km: f64,
    pub velocity_kmh: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrbitTrack {
    pub current: Option<OrbitalPosition>,
    pub path: PathSegmentSet,
    pub updated_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl OrbitTrack {
    pub fn with_error(&self, error: String) -> Self {
        Self {
            error: Some(error),
            ..self.clone()
        }
    }
}
