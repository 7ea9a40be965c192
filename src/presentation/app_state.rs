// Application state for HTTP handlers
use crate::application::layer_service::LayerService;
use crate::application::snapshot_channel::SnapshotReader;
use crate::domain::orbit::OrbitTrack;
use crate::domain::snapshot::{EarthquakeSnapshot, HurricaneSnapshot};

#[derive(Clone)]
pub struct AppState {
    pub hurricanes: SnapshotReader<HurricaneSnapshot>,
    pub earthquakes: SnapshotReader<EarthquakeSnapshot>,
    pub orbit: SnapshotReader<OrbitTrack>,
    pub layer_service: LayerService,
}
