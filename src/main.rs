// Main entry point - Dependency injection, pollers and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{routing::get, Router};
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::earthquake_service::EarthquakeService;
use crate::application::hurricane_service::HurricaneService;
use crate::application::layer_service::LayerService;
use crate::application::orbit_service::OrbitService;
use crate::application::poller::{run_forever, Refresh};
use crate::application::snapshot_channel::snapshot_channel;
use crate::domain::orbit::OrbitTrack;
use crate::domain::snapshot::{EarthquakeSnapshot, HurricaneSnapshot};
use crate::infrastructure::arcgis_feed::ArcGisHurricaneFeed;
use crate::infrastructure::config::{load_app_config, poll_interval};
use crate::infrastructure::iss_client::IssClient;
use crate::infrastructure::usgs_feed::UsgsEarthquakeFeed;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_earthquakes, get_hurricanes, get_iss, get_layers, get_storm, health_check,
    stream_hurricanes, stream_layers,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create feed adapters (infrastructure layer)
    let hurricane_feed = Arc::new(ArcGisHurricaneFeed::new(
        config.hurricanes.base_url.clone(),
        config.hurricanes.positions_layer,
        config.hurricanes.cone_layers.clone(),
        config.hurricanes.secondary_forecast(),
    ));
    let orbit_feed = Arc::new(IssClient::new(config.orbit.base_url.clone()));
    let earthquake_feed = Arc::new(UsgsEarthquakeFeed::new(config.earthquakes.url.clone()));

    // Snapshot cells: each service is the only writer of its own
    let (hurricane_writer, hurricanes) = snapshot_channel(HurricaneSnapshot::default());
    let (orbit_writer, orbit) = snapshot_channel(OrbitTrack::default());
    let (earthquake_writer, earthquakes) = snapshot_channel(EarthquakeSnapshot::default());

    // Create services (application layer)
    let pollers: Vec<(Arc<dyn Refresh>, u64)> = vec![
        (
            Arc::new(HurricaneService::new(hurricane_feed, hurricane_writer)) as Arc<dyn Refresh>,
            config.hurricanes.poll_interval_secs,
        ),
        (
            Arc::new(OrbitService::new(
                orbit_feed,
                orbit_writer,
                config.orbit.window_minutes,
                config.orbit.step_secs,
            )) as Arc<dyn Refresh>,
            config.orbit.poll_interval_secs,
        ),
        (
            Arc::new(EarthquakeService::new(earthquake_feed, earthquake_writer)) as Arc<dyn Refresh>,
            config.earthquakes.poll_interval_secs,
        ),
    ];

    let (shutdown_tx, _) = broadcast::channel(1);
    let mut poller_handles = Vec::new();
    for (task, secs) in pollers {
        poller_handles.push(tokio::spawn(run_forever(
            task,
            poll_interval(secs),
            shutdown_tx.subscribe(),
        )));
    }

    // Create application state
    let layer_service = LayerService::new(hurricanes.clone(), earthquakes.clone(), orbit.clone());
    let state = Arc::new(AppState {
        hurricanes,
        earthquakes,
        orbit,
        layer_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/hurricanes", get(get_hurricanes))
        .route("/hurricanes/stream", get(stream_hurricanes))
        .route("/hurricanes/storms/:id", get(get_storm))
        .route("/layers", get(get_layers))
        .route("/layers/stream", get(stream_layers))
        .route("/iss", get(get_iss))
        .route("/earthquakes", get(get_earthquakes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(%addr, "Starting world-map-feeds service");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    let _ = shutdown_tx.send(());
    for handle in poller_handles {
        let _ = handle.await;
    }

    Ok(())
}
