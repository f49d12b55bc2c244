//! Application configuration
//!
//! Loaded once from disc-inspector.json; command line flags override it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::inspect::ScanMode;

pub const CONFIG_FILE: &str = "disc-inspector.json";

/// Global application config
static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Get the global application config
pub fn get_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::load)
}

/// Root application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Detection settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScanConfig {
    /// Scan data tracks for platform markers and open DiscJuggler containers
    #[serde(default = "default_true")]
    pub intensive: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            intensive: default_true(),
        }
    }
}

impl ScanConfig {
    pub fn mode(&self) -> ScanMode {
        ScanMode::from_intensive(self.intensive)
    }
}

/// Report formatting
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Pretty-print JSON reports
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: default_true() }
    }
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from disc-inspector.json
    pub fn load() -> Self {
        // Try to load from current directory first
        if let Ok(config) = Self::load_from_path(CONFIG_FILE) {
            log::info!("Loaded config from ./{}", CONFIG_FILE);
            return config;
        }

        // Try to load from executable directory
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let config_path = exe_dir.join(CONFIG_FILE);
                if let Ok(config) = Self::load_from_path(&config_path) {
                    log::info!("Loaded config from {}", config_path.display());
                    return config;
                }
            }
        }

        log::debug!("No {} found, using defaults", CONFIG_FILE);
        Self::default()
    }

    fn load_from_path(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.into();
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.scan.intensive);
        assert!(config.output.pretty);
        assert_eq!(config.scan.mode(), ScanMode::Intensive);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "scan": { "intensive": false } }"#).unwrap();
        assert_eq!(config.scan.mode(), ScanMode::Quick);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "output": { "pretty": false } }"#).unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert!(!config.output.pretty);
        assert!(config.scan.intensive);
    }

    #[test]
    fn test_load_from_missing_path() {
        assert!(AppConfig::load_from_path("/nonexistent/disc-inspector.json").is_err());
    }
}
