// ArcGIS feature service adapter for active hurricane data
use crate::application::feed_error::FeedError;
use crate::application::hurricane_feed::HurricaneFeed;
use crate::domain::geo::{is_valid_coordinate, LonLat};
use crate::domain::storm::{RawPosition, TrajectoryCone};
use crate::infrastructure::http_fetch::get_json;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ArcGisHurricaneFeed {
    client: reqwest::Client,
    base_url: String,
    positions_layer: u32,
    cone_layers: Vec<u32>,
    secondary_forecast_layer: Option<u32>,
}

// Features stay untyped until each one is decoded on its own.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    features: Vec<Value>,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct Feature<A, G> {
    attributes: A,
    #[serde(default = "Option::default")]
    geometry: Option<G>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    code: i64,
    #[serde(default)]
    message: String,
}

// The secondary forecast layer names the same values differently.
#[derive(Debug, Deserialize)]
struct PositionAttributes {
    #[serde(rename = "STORMID")]
    storm_id: Option<String>,
    #[serde(rename = "STORMNAME")]
    storm_name: Option<String>,
    #[serde(rename = "BASIN")]
    basin: Option<String>,
    #[serde(rename = "SS", alias = "SSNUM")]
    category: Option<f64>,
    #[serde(rename = "INTENSITY", alias = "MAXWIND")]
    intensity: Option<f64>,
    #[serde(rename = "MSLP")]
    pressure: Option<f64>,
    #[serde(rename = "TAU")]
    tau: Option<f64>,
    #[serde(rename = "DTG")]
    dtg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConeAttributes {
    #[serde(rename = "STORMID")]
    storm_id: Option<String>,
    #[serde(rename = "FCSTPRD")]
    forecast_period: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PolygonGeometry {
    #[serde(default)]
    rings: Vec<Vec<Value>>,
}

impl ArcGisHurricaneFeed {
    pub fn new(
        base_url: String,
        positions_layer: u32,
        cone_layers: Vec<u32>,
        secondary_forecast_layer: Option<u32>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            positions_layer,
            cone_layers,
            secondary_forecast_layer,
        }
    }

    fn build_query_url(&self, layer: u32) -> String {
        format!(
            "{}/{}/query?where={}&outFields=*&outSR=4326&f=json",
            self.base_url,
            layer,
            urlencoding::encode("1=1")
        )
    }

    async fn query_layer<A, G>(&self, layer: u32) -> Result<Vec<Feature<A, G>>, FeedError>
    where
        A: DeserializeOwned,
        G: DeserializeOwned,
    {
        let url = self.build_query_url(layer);
        let response: QueryResponse = get_json(&self.client, &url).await?;
        into_features(response)
    }

    async fn query_positions(&self, layer: u32, feed: &'static str) -> Result<Vec<RawPosition>, FeedError> {
        let result = self
            .query_layer::<PositionAttributes, PointGeometry>(layer)
            .await
            .map(positions_from_features);
        empty_on_recoverable(result, feed)
    }
}

/// A service error fails the whole query; a feature that does not decode is dropped alone.
fn into_features<A, G>(response: QueryResponse) -> Result<Vec<Feature<A, G>>, FeedError>
where
    A: DeserializeOwned,
    G: DeserializeOwned,
{
    if let Some(error) = response.error {
        return Err(FeedError::Service {
            code: error.code,
            message: error.message,
        });
    }

    let total = response.features.len();
    let features: Vec<Feature<A, G>> = response
        .features
        .into_iter()
        .filter_map(|feature| serde_json::from_value(feature).ok())
        .collect();

    if features.len() < total {
        debug!(dropped = total - features.len(), "Dropped undecodable features");
    }
    Ok(features)
}

/// Transport, status and decoding failures mean "no data this time" rather than a failed cycle.
fn empty_on_recoverable<T>(result: Result<Vec<T>, FeedError>, feed: &str) -> Result<Vec<T>, FeedError> {
    match result {
        Err(e) if e.is_recoverable() => {
            warn!(feed, error = %e, "Feed unavailable, treating as empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

fn positions_from_features(features: Vec<Feature<PositionAttributes, PointGeometry>>) -> Vec<RawPosition> {
    let total = features.len();
    let positions: Vec<RawPosition> = features.into_iter().filter_map(to_raw_position).collect();

    if positions.len() < total {
        debug!(dropped = total - positions.len(), "Dropped invalid position records");
    }
    positions
}

fn to_raw_position(feature: Feature<PositionAttributes, PointGeometry>) -> Option<RawPosition> {
    let attrs = feature.attributes;
    let storm_id = attrs.storm_id?.trim().to_string();
    if storm_id.is_empty() {
        return None;
    }

    let geometry = feature.geometry?;
    let (lon, lat) = (geometry.x?, geometry.y?);
    if !is_valid_coordinate(lon, lat) {
        return None;
    }

    let forecast_hour = attrs
        .tau
        .filter(|tau| tau.is_finite() && *tau > 0.0)
        .map(|tau| tau.round() as u32)
        .unwrap_or(0);

    let storm_name = attrs
        .storm_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| storm_id.clone());

    Some(RawPosition {
        storm_name,
        basin: attrs.basin.unwrap_or_default(),
        position: [lon, lat],
        category: attrs.category.filter(|c| c.is_finite()),
        wind_knots: attrs.intensity.filter(|w| w.is_finite()),
        pressure_mb: attrs.pressure.filter(|p| p.is_finite()),
        forecast_hour,
        timestamp_ms: attrs.dtg.filter(|t| t.is_finite()).map(|t| t as i64),
        storm_id,
    })
}

fn cones_from_features(features: Vec<Feature<ConeAttributes, PolygonGeometry>>) -> Vec<TrajectoryCone> {
    features
        .into_iter()
        .filter_map(|feature| {
            let storm_id = feature.attributes.storm_id?.trim().to_string();
            if storm_id.is_empty() {
                return None;
            }

            let rings: Vec<Vec<LonLat>> = feature
                .geometry?
                .rings
                .into_iter()
                .map(|ring| ring.iter().filter_map(ring_vertex).collect::<Vec<LonLat>>())
                .filter(|ring| !ring.is_empty())
                .collect();
            if rings.is_empty() {
                return None;
            }

            Some(TrajectoryCone {
                storm_id,
                forecast_hour: feature
                    .attributes
                    .forecast_period
                    .filter(|h| h.is_finite() && *h > 0.0)
                    .map(|h| h.round() as u32)
                    .unwrap_or(0),
                rings,
            })
        })
        .collect()
}

fn ring_vertex(value: &Value) -> Option<LonLat> {
    let pair = value.as_array()?;
    let (lon, lat) = (pair.first()?.as_f64()?, pair.get(1)?.as_f64()?);
    is_valid_coordinate(lon, lat).then_some([lon, lat])
}

/// Query candidate layers in order until one yields cones; failures and empty layers fall through.
async fn first_cone_layer<F, Fut>(layers: &[u32], mut query: F) -> Vec<TrajectoryCone>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<Feature<ConeAttributes, PolygonGeometry>>, FeedError>>,
{
    for &layer in layers {
        match query(layer).await {
            Ok(features) => {
                let cones = cones_from_features(features);
                if !cones.is_empty() {
                    debug!(layer, cones = cones.len(), "Loaded forecast cones");
                    return cones;
                }
                debug!(layer, "Cone layer candidate returned no cones");
            }
            Err(e) => warn!(layer, error = %e, "Cone layer candidate failed"),
        }
    }
    Vec::new()
}

#[async_trait]
impl HurricaneFeed for ArcGisHurricaneFeed {
    async fn fetch_positions(&self) -> Result<Vec<RawPosition>, FeedError> {
        self.query_positions(self.positions_layer, "positions").await
    }

    async fn fetch_cones(&self) -> Result<Vec<TrajectoryCone>, FeedError> {
        // Deployments publish cones under different layer numbers
        Ok(first_cone_layer(&self.cone_layers, |layer| {
            self.query_layer::<ConeAttributes, PolygonGeometry>(layer)
        })
        .await)
    }

    async fn fetch_secondary_forecast(&self) -> Result<Vec<RawPosition>, FeedError> {
        let Some(layer) = self.secondary_forecast_layer else {
            return Ok(Vec::new());
        };

        // Additive overlay: no failure here may fail the cycle
        match self.query_positions(layer, "secondary-forecast").await {
            Ok(positions) => Ok(positions.into_iter().filter(RawPosition::is_forecast).collect()),
            Err(e) => {
                warn!(error = %e, "Secondary forecast feed rejected the query");
                Ok(Vec::new())
            }
        }
    }
}
