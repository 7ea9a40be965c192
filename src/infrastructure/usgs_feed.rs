// USGS GeoJSON summary feed adapter
use crate::application::earthquake_feed::EarthquakeFeed;
use crate::application::feed_error::FeedError;
use crate::domain::earthquake::Earthquake;
use crate::domain::geo::is_valid_coordinate;
use crate::infrastructure::http_fetch::get_json;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct UsgsEarthquakeFeed {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct QuakeFeature {
    id: String,
    properties: QuakeProperties,
    geometry: Option<QuakeGeometry>,
}

#[derive(Debug, Deserialize)]
struct QuakeProperties {
    mag: Option<f64>,
    place: Option<String>,
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct QuakeGeometry {
    coordinates: Vec<f64>,
}

impl UsgsEarthquakeFeed {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

fn to_earthquake(feature: QuakeFeature) -> Option<Earthquake> {
    let magnitude = feature.properties.mag.filter(|m| m.is_finite())?;
    let coordinates = feature.geometry?.coordinates;
    let (lon, lat) = (*coordinates.first()?, *coordinates.get(1)?);
    if !is_valid_coordinate(lon, lat) {
        return None;
    }

    Some(Earthquake {
        id: feature.id,
        magnitude,
        place: feature.properties.place.unwrap_or_default(),
        time_ms: feature.properties.time.unwrap_or(0),
        position: [lon, lat],
        depth_km: coordinates.get(2).copied().unwrap_or(0.0),
    })
}

fn earthquakes_from_collection(collection: FeatureCollection) -> Vec<Earthquake> {
    let total = collection.features.len();
    let quakes: Vec<Earthquake> = collection
        .features
        .into_iter()
        .filter_map(|feature| serde_json::from_value::<QuakeFeature>(feature).ok())
        .filter_map(to_earthquake)
        .collect();

    if quakes.len() < total {
        debug!(dropped = total - quakes.len(), "Dropped invalid earthquake records");
    }
    quakes
}

#[async_trait]
impl EarthquakeFeed for UsgsEarthquakeFeed {
    async fn fetch_earthquakes(&self) -> Result<Vec<Earthquake>, FeedError> {
        let collection: FeatureCollection = get_json(&self.client, &self.url).await?;
        Ok(earthquakes_from_collection(collection))
    }
}
