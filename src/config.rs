use std::path::Path;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Result;

fn default_offline_mode() -> bool { false }
fn default_log_level() -> String { "info".to_string() }
fn default_port() -> u16 { 8080 }
fn default_static_dir() -> String { "static".to_string() }
fn default_base_url() -> String { "https://power.larc.nasa.gov/api/temporal/daily/point".to_string() }
fn default_latest_year() -> i32 { 2023 }
fn default_fallback_years() -> Vec<i32> { vec![2021, 2022, 2023] }
fn default_timeout_s() -> u64 { 10 }

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_offline_mode")]
    pub offline_mode: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub defaults: ModelDefaults,
    #[serde(default)]
    pub radiation_api: RadiationApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served at `/` for the chart front-end
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Values used when the request and the radiation source leave a gap.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
#[serde(default)]
pub struct ModelDefaults {
    pub irradiance_w_m2: f64,
    pub albedo: f64,
    pub diffuse_fraction: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RadiationApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Requests for later years are answered from `fallback_years`
    #[serde(default = "default_latest_year")]
    pub latest_year: i32,
    #[serde(default = "default_fallback_years")]
    pub fallback_years: Vec<i32>,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            offline_mode: default_offline_mode(),
            log_level: default_log_level(),
            defaults: ModelDefaults::default(),
            radiation_api: RadiationApiConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port(), static_dir: default_static_dir() }
    }
}

impl Default for ModelDefaults {
    fn default() -> Self {
        Self {
            irradiance_w_m2: 800.0,
            albedo: 0.2,
            diffuse_fraction: 0.15,
            latitude: 48.0,
            longitude: 31.0,
        }
    }
}

impl Default for RadiationApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            latest_year: default_latest_year(),
            fallback_years: default_fallback_years(),
            timeout_s: default_timeout_s(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Missing file → defaults; unreadable or malformed file → error.
    /// The flag tells the caller whether the file was found.
    pub fn load_or_default(path: &str) -> Result<(Self, bool)> {
        if Path::new(path).exists() {
            Ok((Self::load(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "server": { "port": 9000 }, "defaults": { "albedo": 0.3 } }"#;
        let c: Config = serde_json::from_str(json).unwrap();
        assert_eq!(c.server.port, 9000);
        assert_eq!(c.server.static_dir, "static");
        assert!(!c.offline_mode);
        assert_eq!(c.log_level, "info");
        assert_eq!(c.defaults.albedo, 0.3);
        assert_eq!(c.defaults.irradiance_w_m2, 800.0);
        assert_eq!(c.defaults.diffuse_fraction, 0.15);
        assert_eq!(c.radiation_api.latest_year, 2023);
        assert_eq!(c.radiation_api.fallback_years, vec![2021, 2022, 2023]);
    }

    #[test]
    fn test_empty_object_is_default() {
        let c: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(c.server.port, 8080);
        assert_eq!(c.defaults.latitude, 48.0);
        assert_eq!(c.defaults.longitude, 31.0);
        assert_eq!(c.radiation_api.timeout_s, 10);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let (c, found) = Config::load_or_default("does-not-exist/config.json").unwrap();
        assert!(!found);
        assert_eq!(c.server.port, 8080);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let path = std::env::temp_dir().join("tilted-irradiance-bad-config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let r = Config::load_or_default(path.to_str().unwrap());
        assert!(matches!(r, Err(crate::error::IrradianceError::ConfigParse(_))));
        let _ = std::fs::remove_file(&path);
    }
}
