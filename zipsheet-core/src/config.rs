use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://api.zippopotam.us";
pub const DEFAULT_FORECAST_BASE_URL: &str = "https://api.open-meteo.com";
const WORKBOOK_FILE: &str = "zipsheet.json";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// geocoding_base_url = "https://api.zippopotam.us"
/// workbook_path = "/home/me/weather.json"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Override for the postal code lookup service.
    pub geocoding_base_url: Option<String>,

    /// Override for the forecast service.
    pub forecast_base_url: Option<String>,

    /// Workbook used when no path is given on the command line.
    pub workbook_path: Option<PathBuf>,
}

impl Config {
    pub fn geocoding_base_url(&self) -> &str {
        self.geocoding_base_url.as_deref().unwrap_or(DEFAULT_GEOCODING_BASE_URL)
    }

    pub fn forecast_base_url(&self) -> &str {
        self.forecast_base_url.as_deref().unwrap_or(DEFAULT_FORECAST_BASE_URL)
    }

    /// Configured workbook path, or `zipsheet.json` in the platform data dir.
    pub fn workbook_path(&self) -> Result<PathBuf> {
        match &self.workbook_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join(WORKBOOK_FILE)),
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
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

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
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
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "zipsheet", "zipsheet")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}
