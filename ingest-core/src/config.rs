use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::{Coordinates, WeatherQuery};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Supplies the credential and coordinates for each ingestion run.
#[async_trait]
pub trait ConfigSource: Send + Sync + Debug {
    async fn weather_query(&self) -> Result<WeatherQuery>;
}

/// Configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// lat = 51.5072
/// long = -0.1276
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,

    /// Provider root URL, without the `/data/2.5/weather` path.
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,

    /// SQLite file; defaults to the platform data directory.
    pub database: Option<PathBuf>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    /// `WEATHER_API_KEY` takes precedence over the stored key.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            cfg.apply_api_key_override(key);
        }

        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    fn apply_api_key_override(&mut self, key: String) {
        if !key.trim().is_empty() {
            self.api_key = Some(key);
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join("weather.db")),
        }
    }

    pub fn query(&self) -> Result<WeatherQuery> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather-ingest configure` or set {API_KEY_ENV}."
            )
        })?;

        let (lat, long) = self.lat.zip(self.long).ok_or_else(|| {
            anyhow!(
                "No coordinates configured.\n\
                 Hint: run `weather-ingest configure` and enter latitude and longitude."
            )
        })?;

        Ok(WeatherQuery { api_key, coordinates: Coordinates { lat, long } })
    }
}

#[async_trait]
impl ConfigSource for Config {
    async fn weather_query(&self) -> Result<WeatherQuery> {
        self.query()
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-ingest", "weather-ingest")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        Config {
            api_key: Some("KEY".into()),
            lat: Some(48.85),
            long: Some(2.35),
            ..Config::default()
        }
    }

    #[test]
    fn query_errors_when_api_key_missing() {
        let cfg = Config { api_key: None, ..configured() };
        let err = cfg.query().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn query_errors_when_coordinate_missing() {
        let cfg = Config { long: None, ..configured() };
        let err = cfg.query().unwrap_err();

        assert!(err.to_string().contains("No coordinates configured"));
    }

    #[test]
    fn query_carries_credential_and_coordinates() {
        let query = configured().query().expect("complete config");

        assert_eq!(query.api_key, "KEY");
        assert_eq!(query.coordinates, Coordinates { lat: 48.85, long: 2.35 });
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = Config::default();

        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn blank_env_key_does_not_override() {
        let mut cfg = configured();

        cfg.apply_api_key_override("   ".into());
        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));

        cfg.apply_api_key_override("FROM_ENV".into());
        assert_eq!(cfg.api_key.as_deref(), Some("FROM_ENV"));
    }

    #[test]
    fn save_and_load_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config { timeout_secs: Some(3), ..configured() };
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_loads_empty_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = Config::load_from(&dir.path().join("absent.toml")).expect("load");

        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn partial_file_parses() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "lat = 10.5\nlong = -3.25\n").expect("write");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.lat, Some(10.5));
        assert!(loaded.api_key.is_none());
    }

    #[tokio::test]
    async fn config_acts_as_config_source() {
        let source: Box<dyn ConfigSource> = Box::new(configured());
        let query = source.weather_query().await.expect("query");

        assert_eq!(query.api_key, "KEY");
    }
}
