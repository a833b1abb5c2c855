use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::{ObserverPosition, TemperatureUnit};

/// Default place to report on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone name, e.g. "America/New_York".
    pub timezone: String,
}

impl LocationConfig {
    pub fn position(&self) -> Result<ObserverPosition> {
        ObserverPosition::new(self.latitude, self.longitude)
            .context("Configured location is out of range")
    }
}

/// Settings for the Open-Meteo data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenMeteoConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// temperature_unit = "fahrenheit"
///
/// [location]
/// latitude = 40.7128
/// longitude = -74.006
/// timezone = "America/New_York"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    pub location: Option<LocationConfig>,

    #[serde(default)]
    pub open_meteo: OpenMeteoConfig,
}

impl Config {
    /// The stored default location, or a hint on how to set one.
    pub fn default_location(&self) -> Result<&LocationConfig> {
        self.location.as_ref().ok_or_else(|| {
            anyhow!(
                "No default location configured.\n\
                 Hint: run `solmate configure` or pass --latitude, --longitude and --timezone."
            )
        })
    }

    pub fn set_location(&mut self, location: LocationConfig) {
        self.location = Some(location);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
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

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
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
        let dirs = ProjectDirs::from("dev", "solmate", "solmate")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
