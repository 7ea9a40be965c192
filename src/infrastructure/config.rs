use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub hurricanes: HurricaneSettings,
    #[serde(default)]
    pub orbit: OrbitSettings,
    #[serde(default)]
    pub earthquakes: EarthquakeSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HurricaneSettings {
    pub base_url: String,
    pub positions_layer: u32,
    /// Candidate cone layers, tried in order
    pub cone_layers: Vec<u32>,
    pub secondary_forecast_layer: Option<u32>,
    /// `false` turns the secondary forecast overlay off
    pub secondary_forecast_enabled: bool,
    pub poll_interval_secs: u64,
}

impl Default for HurricaneSettings {
    fn default() -> Self {
        Self {
            base_url: "https://services9.arcgis.com/RHVPKKiFTONKtxq3/arcgis/rest/services/Active_Hurricanes_v1/FeatureServer".to_string(),
            positions_layer: 0,
            cone_layers: vec![4, 5, 2],
            secondary_forecast_layer: Some(1),
            secondary_forecast_enabled: true,
            poll_interval_secs: 300,
        }
    }
}

impl HurricaneSettings {
    pub fn secondary_forecast(&self) -> Option<u32> {
        self.secondary_forecast_layer
            .filter(|_| self.secondary_forecast_enabled)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OrbitSettings {
    pub base_url: String,
    pub window_minutes: u32,
    pub step_secs: u32,
    pub poll_interval_secs: u64,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.wheretheiss.at/v1/satellites/25544".to_string(),
            window_minutes: 45,
            step_secs: 60,
            poll_interval_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EarthquakeSettings {
    pub url: String,
    pub poll_interval_secs: u64,
}

impl Default for EarthquakeSettings {
    fn default() -> Self {
        Self {
            url: "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/2.5_day.geojson"
                .to_string(),
            poll_interval_secs: 300,
        }
    }
}

/// Zero would make the ticker panic; clamp to one second.
pub fn poll_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.max(1))
}

/// Defaults, then `config/world-map.toml` if present, then `WORLD_MAP_*` variables
/// (e.g. `WORLD_MAP_HURRICANES__POLL_INTERVAL_SECS=60`,
/// `WORLD_MAP_HURRICANES__SECONDARY_FORECAST_ENABLED=false`).
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/world-map").required(false))
        .add_source(
            config::Environment::with_prefix("WORLD_MAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("hurricanes.cone_layers"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = from_toml("[server]\nbind = \"127.0.0.1:9000\"\n");

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.hurricanes.cone_layers, vec![4, 5, 2]);
        assert_eq!(config.orbit.window_minutes, 45);
    }

    #[test]
    fn test_partial_section_layers_onto_defaults() {
        let config = from_toml("[hurricanes]\npoll_interval_secs = 60\n\n[orbit]\nstep_secs = 30\n");

        assert_eq!(config.hurricanes.poll_interval_secs, 60);
        assert_eq!(config.hurricanes.positions_layer, 0);
        assert_eq!(config.hurricanes.cone_layers, vec![4, 5, 2]);
        assert_eq!(config.hurricanes.secondary_forecast(), Some(1));
        assert_eq!(config.orbit.step_secs, 30);
        assert_eq!(config.orbit.window_minutes, 45);
    }

    #[test]
    fn test_secondary_forecast_can_be_disabled() {
        let config = from_toml(
            r#"
            [hurricanes]
            base_url = "http://localhost:9999/FeatureServer"
            cone_layers = [7]
            secondary_forecast_enabled = false
            "#,
        );

        assert_eq!(config.hurricanes.cone_layers, vec![7]);
        assert_eq!(config.hurricanes.secondary_forecast_layer, Some(1));
        assert!(config.hurricanes.secondary_forecast().is_none());
    }

    #[test]
    fn test_secondary_forecast_disabled_from_environment() {
        let source = config::Environment::with_prefix("WORLD_MAP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(config::Map::from([(
                "WORLD_MAP_HURRICANES__SECONDARY_FORECAST_ENABLED".to_string(),
                "false".to_string(),
            )])));
        let config: AppConfig = config::Config::builder()
            .add_source(source)
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(config.hurricanes.secondary_forecast().is_none());
        assert_eq!(config.hurricanes.poll_interval_secs, 300);
    }

    #[test]
    fn test_poll_interval_never_zero() {
        assert_eq!(poll_interval(0), Duration::from_secs(1));
        assert_eq!(poll_interval(300), Duration::from_secs(300));
    }
}
