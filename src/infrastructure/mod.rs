// Infrastructure layer - External feeds, configuration and response encoding
pub mod arcgis_feed;
pub mod chunked_json;
pub mod config;
pub mod http_fetch;
pub mod http_response;
pub mod iss_client;
pub mod usgs_feed;
