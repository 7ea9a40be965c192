// HTTP request handlers
use crate::infrastructure::chunked_json::{stream_from_watch, stream_items};
use crate::infrastructure::http_response::json_response;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get("accept-encoding")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("br"))
        .unwrap_or(false)
}

async fn respond<T: Serialize + ?Sized>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Latest hurricane snapshot, including the error of the last failed cycle if any
pub async fn get_hurricanes(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.hurricanes.current();
    respond(snapshot.as_ref(), &headers).await
}

pub async fn get_storm(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let snapshot = state.hurricanes.current();
    match snapshot.storm(&id) {
        Some(storm) => respond(storm, &headers).await,
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Push a new chunk each time a hurricane snapshot is published
pub async fn stream_hurricanes(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    stream_from_watch(state.hurricanes.watch(), accepts_brotli(&headers)).await
}

/// Ordered layer descriptors for the map compositor
pub async fn get_layers(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let layers = state.layer_service.layers();
    respond(&layers, &headers).await
}

/// Same layers, one chunk each, bottom layer first
pub async fn stream_layers(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    stream_items(state.layer_service.layers(), accepts_brotli(&headers)).await
}

pub async fn get_iss(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let track = state.orbit.current();
    respond(track.as_ref(), &headers).await
}

pub async fn get_earthquakes(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.earthquakes.current();
    respond(snapshot.as_ref(), &headers).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::layer_service::LayerService;
    use crate::application::snapshot_channel::{snapshot_channel, SnapshotWriter};
    use crate::application::storm_processor::process_storms;
    use crate::domain::orbit::OrbitTrack;
    use crate::domain::snapshot::{EarthquakeSnapshot, HurricaneSnapshot};
    use crate::domain::storm::RawPosition;

    fn state() -> (Arc<AppState>, SnapshotWriter<HurricaneSnapshot>) {
        let (hurricane_writer, hurricanes) = snapshot_channel(HurricaneSnapshot::default());
        let (_, earthquakes) = snapshot_channel(EarthquakeSnapshot::default());
        let (_, orbit) = snapshot_channel(OrbitTrack::default());
        let layer_service = LayerService::new(hurricanes.clone(), earthquakes.clone(), orbit.clone());

        let state = Arc::new(AppState {
            hurricanes,
            earthquakes,
            orbit,
            layer_service,
        });
        (state, hurricane_writer)
    }

    fn storm_snapshot() -> HurricaneSnapshot {
        let positions = vec![RawPosition {
            storm_id: "wp212024".to_string(),
            storm_name: "KONG-REY".to_string(),
            basin: "WP".to_string(),
            position: [125.0, 20.0],
            category: Some(4.0),
            wind_knots: Some(120.0),
            pressure_mb: Some(935.0),
            forecast_hour: 0,
            timestamp_ms: Some(1_730_000_000_000),
        }];
        HurricaneSnapshot {
            processed_storms: process_storms(&positions, &[]),
            positions,
            ..HurricaneSnapshot::default()
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_accepts_brotli() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_brotli(&headers));

        headers.insert("accept-encoding", "gzip, deflate, br".parse().unwrap());
        assert!(accepts_brotli(&headers));
    }

    #[tokio::test]
    async fn test_storm_lookup() {
        let (state, writer) = state();
        writer.publish(storm_snapshot());

        let found = get_storm(Path("wp212024".to_string()), HeaderMap::new(), State(state.clone())).await;
        assert_eq!(found.status(), StatusCode::OK);
        let json = body_json(found).await;
        assert_eq!(json["name"], "KONG-REY");
        assert_eq!(json["current_category"], 4);

        let missing = get_storm(Path("al012025".to_string()), HeaderMap::new(), State(state)).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_hurricanes_exposes_error_field() {
        let (state, writer) = state();
        writer.publish(HurricaneSnapshot::default().with_error("upstream down".to_string()));

        let json = body_json(get_hurricanes(HeaderMap::new(), State(state)).await).await;
        assert_eq!(json["error"], "upstream down");
        assert_eq!(json["processed_storms"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_layers_endpoint_lists_every_layer() {
        let (state, writer) = state();
        writer.publish(storm_snapshot());

        let json = body_json(get_layers(HeaderMap::new(), State(state)).await).await;
        let layers = json.as_array().unwrap();

        assert_eq!(layers.len(), 8);
        assert_eq!(layers[0]["id"], "hurricane-cones");
        assert_eq!(layers[4]["id"], "hurricane-positions");
        assert_eq!(layers[4]["data"].as_array().unwrap().len(), 1);
    }
}
