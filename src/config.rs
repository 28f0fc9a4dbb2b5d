//! Exporter configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`LVX_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use level_core::AngleUnit;
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Main exporter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`LVX_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // LVX_EXPORT__JSON_OUTPUT=out.json -> export.json_output = "out.json"
        figment = figment.merge(Env::prefixed("LVX_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Scene snapshot to read (RON)
    pub snapshot: PathBuf,
    /// Where to write the `.scene` text export, if at all
    pub text_output: Option<PathBuf>,
    /// Where to write the `.json` structured export, if at all
    pub json_output: Option<PathBuf>,
    /// Rotation unit in the structured export
    pub structured_rotation: AngleUnit,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("scenes/level.ron"),
            text_output: None,
            json_output: Some(PathBuf::from("level.json")),
            structured_rotation: AngleUnit::Radians,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Run the snapshot validator before exporting
    pub validate: bool,
    /// Build collider geometry and log its size
    pub report_colliders: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            validate: true,
            report_colliders: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.export.snapshot, PathBuf::from("scenes/level.ron"));
        assert_eq!(config.export.structured_rotation, AngleUnit::Radians);
        assert!(config.debug.validate);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("snapshot"));
        assert!(toml.contains("structured_rotation = \"radians\""));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str("[export]\ntext_output = \"out.scene\"\n").unwrap();
        assert_eq!(config.export.text_output, Some(PathBuf::from("out.scene")));
        assert_eq!(config.export.json_output, Some(PathBuf::from("level.json")));
        assert_eq!(config.debug.log_level, "info");
    }
}
