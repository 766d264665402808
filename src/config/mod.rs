use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::calendar::{CalendarDate, WeekdayConvention};

fn default_title_format() -> String {
    "%B %Y".to_string()
}

fn default_day_format() -> String {
    "%-d".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// First column of the grid ("sunday", "monday", ...)
    #[serde(default)]
    pub week_start: WeekdayConvention,

    /// strftime pattern for the month header
    #[serde(default = "default_title_format")]
    pub title_format: String,

    /// strftime pattern for each day cell
    #[serde(default = "default_day_format")]
    pub day_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            week_start: WeekdayConvention::default(),
            title_format: default_title_format(),
            day_format: default_day_format(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("monthgrid");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, or create a default one
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => match config.validate() {
                        Ok(()) => return Ok(config),
                        Err(e) => tracing::warn!("Ignoring invalid config: {:#}", e),
                    },
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save() {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    /// Load an explicitly named config file; any problem is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that both format patterns are usable
    pub fn validate(&self) -> Result<()> {
        // Any real date will do for a trial run
        let sample = CalendarDate::from_ymd(2000, 1, 1)?;

        sample
            .format(&self.title_format)
            .map_err(|_| anyhow::anyhow!("Invalid title_format: '{}'", self.title_format))?;
        sample
            .format(&self.day_format)
            .map_err(|_| anyhow::anyhow!("Invalid day_format: '{}'", self.day_format))?;
        Ok(())
    }
}
