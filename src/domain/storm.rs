// Storm domain models
use super::category::Category;
use super::geo::{LonLat, PathSegmentSet};
use serde::Serialize;

/// One observed or forecast fix for a storm, already validated at the parse boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawPosition {
    pub storm_id: String,
    pub storm_name: String,
    pub basin: String,
    pub position: LonLat,
    /// Saffir-Simpson category as reported; unreliable on forecast records.
    pub category: Option<f64>,
    pub wind_knots: Option<f64>,
    pub pressure_mb: Option<f64>,
    /// Hours ahead of the advisory; 0 for observed fixes.
    pub forecast_hour: u32,
    pub timestamp_ms: Option<i64>,
}

impl RawPosition {
    pub fn is_forecast(&self) -> bool {
        self.forecast_hour > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifiedPositions {
    /// Observed fixes in time order, excluding `current`.
    pub historical: Vec<RawPosition>,
    pub current: Option<RawPosition>,
    /// Forecast fixes ordered by increasing forecast hour.
    pub forecast: Vec<RawPosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Historical,
    Forecast,
}

impl SegmentKind {
    pub fn stroke_width(self) -> f32 {
        match self {
            SegmentKind::Historical => 4.0,
            SegmentKind::Forecast => 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColoredTrackSegment {
    pub path: Vec<LonLat>,
    pub color: [u8; 4],
    pub category: Category,
    pub storm_id: String,
    pub storm_name: String,
    pub kind: SegmentKind,
}

impl ColoredTrackSegment {
    pub fn new(
        path: Vec<LonLat>,
        category: Category,
        storm_id: &str,
        storm_name: &str,
        kind: SegmentKind,
    ) -> Self {
        Self {
            path,
            color: category.color(),
            category,
            storm_id: storm_id.to_string(),
            storm_name: storm_name.to_string(),
            kind,
        }
    }
}

/// Uncertainty cone as delivered by the feature service.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryCone {
    pub storm_id: String,
    pub forecast_hour: u32,
    pub rings: Vec<Vec<LonLat>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderableCone {
    pub storm_id: String,
    pub forecast_hour: u32,
    pub polygon: Vec<LonLat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedStorm {
    pub id: String,
    pub name: String,
    pub basin: String,
    pub current_category: Category,
    pub historical: Vec<RawPosition>,
    pub current: RawPosition,
    pub forecast: Vec<RawPosition>,
    pub historical_path: PathSegmentSet,
    pub forecast_path: PathSegmentSet,
    pub colored_track_segments: Vec<ColoredTrackSegment>,
    pub cones: Vec<RenderableCone>,
}
