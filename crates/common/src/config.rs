//! Application configuration.

use std::path::{Path, PathBuf};

use lodestone_model::{MagneticConfig, SpringParams};
use serde::{Deserialize, Serialize};

use crate::error::{LodestoneError, LodestoneResult};

/// Global application configuration.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rendering frame rate used by simulations and the live loop.
    pub frame_rate_hz: u32,

    /// Pointer attraction settings.
    pub magnetic: MagneticConfig,

    /// Spring that follows the magnetic offset.
    pub magnetic_spring: SpringParams,

    /// Spring that follows scroll progress.
    pub scroll_spring: SpringParams,

    /// Parallax travel in pixels at full scroll progress.
    pub parallax_distance: f64,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "lodestone_motion=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60,
            magnetic: MagneticConfig::default(),
            magnetic_spring: SpringParams::magnetic(),
            scroll_spring: SpringParams::scroll(),
            parallax_distance: 300.0,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = ?config_path, error = %e, "Ignoring invalid config");
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> LodestoneResult<Self> {
        if !path.exists() {
            return Err(LodestoneError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = ?path, "Loaded config");
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> LodestoneResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> LodestoneResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> LodestoneResult<()> {
        if self.frame_rate_hz == 0 || self.frame_rate_hz > 1_000 {
            return Err(LodestoneError::config(format!(
                "frame_rate_hz must be in 1..=1000, got {}",
                self.frame_rate_hz
            )));
        }
        if !self.magnetic.strength.is_finite() {
            return Err(LodestoneError::config("magnetic.strength must be finite"));
        }
        if !self.parallax_distance.is_finite() {
            return Err(LodestoneError::config("parallax_distance must be finite"));
        }
        self.magnetic_spring
            .validate()
            .map_err(|e| LodestoneError::invalid_spring("magnetic_spring", e))?;
        self.scroll_spring
            .validate()
            .map_err(|e| LodestoneError::invalid_spring("scroll_spring", e))?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("lodestone").join("config.json")
}
