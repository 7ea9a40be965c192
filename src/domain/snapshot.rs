// Published feed snapshots
use super::earthquake::Earthquake;
use super::storm::{ColoredTrackSegment, ProcessedStorm, RawPosition, RenderableCone};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything the map needs from one hurricane update cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HurricaneSnapshot {
    pub positions: Vec<RawPosition>,
    pub cones: Vec<RenderableCone>,
    pub processed_storms: Vec<ProcessedStorm>,
    pub secondary_forecast_segments: Vec<ColoredTrackSegment>,
    pub updated_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl HurricaneSnapshot {
    /// Same data as `self`, flagged with the error of a failed cycle.
    pub fn with_error(&self, error: String) -> Self {
        Self {
            error: Some(error),
            ..self.clone()
        }
    }

    pub fn storm(&self, id: &str) -> Option<&ProcessedStorm> {
        self.processed_storms.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EarthquakeSnapshot {
    pub earthquakes: Vec<Earthquake>,
    pub updated_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl EarthquakeSnapshot {
    pub fn with_error(&self, error: String) -> Self {
        Self {
            error: Some(error),
            ..self.clone()
        }
    }
}
