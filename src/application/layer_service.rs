// Layer assembly - Turns feed snapshots into ordered drawable layers
use crate::application::snapshot_channel::SnapshotReader;
use crate::domain::category::{resolve_category, CategorySource};
use crate::domain::layer::{
    LayerData, LayerDescriptor, LayerId, PathFeature, PointFeature, PolygonFeature,
};
use crate::domain::orbit::OrbitTrack;
use crate::domain::snapshot::{EarthquakeSnapshot, HurricaneSnapshot};
use crate::domain::storm::{ColoredTrackSegment, SegmentKind};
use std::iter;
use tracing::trace;

const CONE_FILL: [u8; 4] = [255, 255, 255, 40];
const CONE_LINE: [u8; 4] = [255, 255, 255, 140];
const ISS_TRACK_COLOR: [u8; 4] = [120, 200, 255, 180];
const ISS_COLOR: [u8; 4] = [255, 255, 255, 255];
const ISS_RADIUS: f32 = 9.0;
const ISS_REF: &str = "iss";

#[derive(Clone)]
pub struct LayerService {
    hurricanes: SnapshotReader<HurricaneSnapshot>,
    earthquakes: SnapshotReader<EarthquakeSnapshot>,
    orbit: SnapshotReader<OrbitTrack>,
}

impl LayerService {
    pub fn new(
        hurricanes: SnapshotReader<HurricaneSnapshot>,
        earthquakes: SnapshotReader<EarthquakeSnapshot>,
        orbit: SnapshotReader<OrbitTrack>,
    ) -> Self {
        Self {
            hurricanes,
            earthquakes,
            orbit,
        }
    }

    pub fn layers(&self) -> Vec<LayerDescriptor> {
        let layers = assemble_layers(
            &self.hurricanes.current(),
            &self.earthquakes.current(),
            &self.orbit.current(),
        );
        trace!(
            features = layers.iter().map(|l| l.data.len()).sum::<usize>(),
            empty_layers = layers.iter().filter(|l| l.data.is_empty()).count(),
            "Assembled layers"
        );
        layers
    }
}

/// Every layer in `LayerId::DRAW_ORDER`, present even when empty so ids never disappear.
pub fn assemble_layers(
    hurricanes: &HurricaneSnapshot,
    earthquakes: &EarthquakeSnapshot,
    orbit: &OrbitTrack,
) -> Vec<LayerDescriptor> {
    LayerId::DRAW_ORDER
        .iter()
        .map(|&id| {
            let data = match id {
                LayerId::HurricaneCones => cone_layer(hurricanes),
                LayerId::HurricaneHistoricalTracks => {
                    track_layer(storm_segments(hurricanes, SegmentKind::Historical))
                }
                LayerId::HurricaneForecastTracks => {
                    track_layer(storm_segments(hurricanes, SegmentKind::Forecast))
                }
                LayerId::HurricaneSecondaryForecast => {
                    track_layer(hurricanes.secondary_forecast_segments.iter())
                }
                LayerId::HurricanePositions => position_layer(hurricanes),
                LayerId::Earthquakes => earthquake_layer(earthquakes),
                LayerId::IssTrack => iss_track_layer(orbit),
                LayerId::IssPosition => iss_position_layer(orbit),
            };
            LayerDescriptor::new(id, data)
        })
        .collect()
}

fn storm_segments(
    snapshot: &HurricaneSnapshot,
    kind: SegmentKind,
) -> impl Iterator<Item = &ColoredTrackSegment> {
    snapshot
        .processed_storms
        .iter()
        .flat_map(|storm| storm.colored_track_segments.iter())
        .filter(move |segment| segment.kind == kind)
}

fn track_layer<'a>(segments: impl Iterator<Item = &'a ColoredTrackSegment>) -> LayerData {
    LayerData::Path(
        segments
            .map(|segment| PathFeature {
                path: segment.path.clone(),
                color: segment.color,
                width: segment.kind.stroke_width(),
                ref_id: segment.storm_id.clone(),
                label: format!("{} ({})", segment.storm_name, segment.category.label()),
            })
            .collect(),
    )
}

fn cone_layer(snapshot: &HurricaneSnapshot) -> LayerData {
    LayerData::Polygon(
        snapshot
            .cones
            .iter()
            .map(|cone| PolygonFeature {
                polygon: cone.polygon.clone(),
                fill_color: CONE_FILL,
                line_color: CONE_LINE,
                ref_id: cone.storm_id.clone(),
                label: format!("{} cone (+{}h)", cone.storm_id, cone.forecast_hour),
            })
            .collect(),
    )
}

fn position_layer(snapshot: &HurricaneSnapshot) -> LayerData {
    let mut points = Vec::new();

    for storm in &snapshot.processed_storms {
        let fixes = storm
            .historical
            .iter()
            .chain(iter::once(&storm.current))
            .chain(storm.forecast.iter());

        for fix in fixes {
            let category = resolve_category(fix, CategorySource::for_position(fix));
            let label = if fix.is_forecast() {
                format!("{} +{}h ({})", storm.name, fix.forecast_hour, category.label())
            } else {
                format!("{} ({})", storm.name, category.label())
            };
            points.push(PointFeature {
                position: fix.position,
                color: category.color(),
                radius: category.dot_radius(),
                ref_id: storm.id.clone(),
                label,
            });
        }
    }

    LayerData::Scatter(points)
}

fn earthquake_layer(snapshot: &EarthquakeSnapshot) -> LayerData {
    LayerData::Scatter(
        snapshot
            .earthquakes
            .iter()
            .map(|quake| PointFeature {
                position: quake.position,
                color: quake.color(),
                radius: quake.radius(),
                ref_id: quake.id.clone(),
                label: format!("M{:.1} {}", quake.magnitude, quake.place),
            })
            .collect(),
    )
}

fn iss_track_layer(track: &OrbitTrack) -> LayerData {
    LayerData::Path(
        track
            .path
            .iter()
            .filter(|segment| segment.len() >= 2)
            .map(|segment| PathFeature {
                path: segment.clone(),
                color: ISS_TRACK_COLOR,
                width: 2.0,
                ref_id: ISS_REF.to_string(),
                label: "ISS ground track".to_string(),
            })
            .collect(),
    )
}

fn iss_position_layer(track: &OrbitTrack) -> LayerData {
    LayerData::Scatter(
        track
            .current
            .iter()
            .map(|current| PointFeature {
                position: current.position,
                color: ISS_COLOR,
                radius: ISS_RADIUS,
                ref_id: ISS_REF.to_string(),
                label: format!("ISS {:.0} km", current.altitude_km),
            })
            .collect(),
    )
}
