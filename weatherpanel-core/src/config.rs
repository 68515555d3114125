use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{location::ConfiguredPosition, model::Coordinates};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/";

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "WEATHERPANEL_API_KEY";

/// Position settings used for the automatic lookup on startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// When false, position lookups are treated as denied.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

fn default_enabled() -> bool {
    true
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self { enabled: true, lat: None, lon: None }
    }
}

impl LocationConfig {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Base endpoint; requests go to `{base_url}weather`.
    pub base_url: Option<String>,

    /// Example TOML:
    /// [location]
    /// enabled = true
    /// lat = 51.5
    /// lon = -0.12
    #[serde(default)]
    pub location: LocationConfig,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// API key from the environment, falling back to the stored one.
    pub fn resolve_api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        self.api_key_with_override(from_env)
    }

    fn api_key_with_override(&self, override_key: Option<String>) -> Result<String> {
        override_key
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weatherpanel configure` or set {API_KEY_ENV}."
                )
            })
    }

    /// Position provider from the `[location]` table, with explicit coordinates winning.
    pub fn position(&self, explicit: Option<Coordinates>) -> ConfiguredPosition {
        if !self.location.enabled {
            return ConfiguredPosition::denied();
        }
        ConfiguredPosition::new(explicit.or_else(|| self.location.coordinates()))
    }

    /// Load config from the platform path, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform path, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

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

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherpanel", "weatherpanel")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::LocationError, location::PositionProvider};

    #[test]
    fn missing_api_key_has_hint() {
        let cfg = Config::default();
        let err = cfg.api_key_with_override(None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `weatherpanel configure`"));
    }

    #[test]
    fn override_key_wins_over_stored() {
        let cfg = Config { api_key: Some("STORED".into()), ..Config::default() };

        assert_eq!(cfg.api_key_with_override(None).unwrap(), "STORED");
        assert_eq!(cfg.api_key_with_override(Some("ENV".into())).unwrap(), "ENV");
    }

    #[test]
    fn base_url_defaults_to_openweather() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn partial_location_toml_parses() {
        let cfg: Config = toml::from_str("api_key = \"K\"\n[location]\nlat = 1.0\n").unwrap();

        assert!(cfg.location.enabled);
        assert_eq!(cfg.location.coordinates(), None);
    }

    #[tokio::test]
    async fn disabled_location_is_denied_even_with_coordinates() {
        let mut cfg = Config::default();
        cfg.location = LocationConfig { enabled: false, lat: Some(1.0), lon: Some(2.0) };

        let err = cfg.position(Some(Coordinates::new(3.0, 4.0))).current_position().await;
        assert_eq!(err, Err(LocationError::Denied));
    }

    #[tokio::test]
    async fn explicit_coordinates_override_stored_ones() {
        let mut cfg = Config::default();
        cfg.location.lat = Some(1.0);
        cfg.location.lon = Some(2.0);

        let stored = cfg.position(None).current_position().await;
        assert_eq!(stored, Ok(Coordinates::new(1.0, 2.0)));

        let explicit = cfg.position(Some(Coordinates::new(51.5, -0.12))).current_position().await;
        assert_eq!(explicit, Ok(Coordinates::new(51.5, -0.12)));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        cfg.location.lat = Some(51.5);
        cfg.location.lon = Some(-0.12);
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("KEY"));
        assert_eq!(loaded.location.coordinates(), Some(Coordinates::new(51.5, -0.12)));
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert!(cfg.api_key.is_none());
        assert!(cfg.location.enabled);
    }
}
