// Drawable layer descriptors handed to the map compositor
use super::geo::LonLat;
use serde::Serialize;

/// Layer identity. Ids are stable across rebuilds because the tooltip dispatcher keys on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerId {
    HurricaneCones,
    HurricaneHistoricalTracks,
    HurricaneForecastTracks,
    HurricaneSecondaryForecast,
    HurricanePositions,
    Earthquakes,
    IssTrack,
    IssPosition,
}

impl LayerId {
    /// Bottom to top.
    pub const DRAW_ORDER: [LayerId; 8] = [
        LayerId::HurricaneCones,
        LayerId::HurricaneHistoricalTracks,
        LayerId::HurricaneForecastTracks,
        LayerId::HurricaneSecondaryForecast,
        LayerId::HurricanePositions,
        LayerId::Earthquakes,
        LayerId::IssTrack,
        LayerId::IssPosition,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayerId::HurricaneCones => "hurricane-cones",
            LayerId::HurricaneHistoricalTracks => "hurricane-historical-tracks",
            LayerId::HurricaneForecastTracks => "hurricane-forecast-tracks",
            LayerId::HurricaneSecondaryForecast => "hurricane-secondary-forecast",
            LayerId::HurricanePositions => "hurricane-positions",
            LayerId::Earthquakes => "earthquakes",
            LayerId::IssTrack => "iss-track",
            LayerId::IssPosition => "iss-position",
        }
    }

    pub fn pickable(self) -> bool {
        !matches!(self, LayerId::HurricaneCones | LayerId::IssTrack)
    }
}

impl Serialize for LayerId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathFeature {
    pub path: Vec<LonLat>,
    pub color: [u8; 4],
    pub width: f32,
    /// Identifier the tooltip dispatcher resolves details from.
    pub ref_id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointFeature {
    pub position: LonLat,
    pub color: [u8; 4],
    pub radius: f32,
    pub ref_id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonFeature {
    pub polygon: Vec<LonLat>,
    pub fill_color: [u8; 4],
    pub line_color: [u8; 4],
    pub ref_id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum LayerData {
    Path(Vec<PathFeature>),
    Scatter(Vec<PointFeature>),
    Polygon(Vec<PolygonFeature>),
}

impl LayerData {
    pub fn len(&self) -> usize {
        match self {
            LayerData::Path(features) => features.len(),
            LayerData::Scatter(features) => features.len(),
            LayerData::Polygon(features) => features.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDescriptor {
    pub id: LayerId,
    pub pickable: bool,
    #[serde(flatten)]
    pub data: LayerData,
}

impl LayerDescriptor {
    pub fn new(id: LayerId, data: LayerData) -> Self {
        Self {
            id,
            pickable: id.pickable(),
            data,
        }
    }
}
