//! Configuration loading for crewd.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Get the crewd home directory (~/.crewd).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".crewd"))
}

/// Get the settings file path.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("settings.json"))
}

/// Load settings from ~/.crewd/settings.json.
///
/// A missing file is not an error; the relay runs fine on defaults.
pub fn load_settings() -> Result<Settings> {
    let path = get_settings_path()?;

    if !path.exists() {
        tracing::debug!("No settings file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let settings: Settings = serde_json::from_str(&content)?;

    validate_settings(&settings)?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.server.port == 0 {
        return Err(Error::Config("server.port must be nonzero".to_string()));
    }
    if settings.retention.enabled && settings.retention.sweep_interval_secs == 0 {
        return Err(Error::Config(
            "retention.sweep_interval_secs must be nonzero when retention is enabled".to_string(),
        ));
    }
    Ok(())
}

/// Listen address configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Message retention configuration.
///
/// Disabling retention restores unbounded growth: read messages are
/// never removed.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RetentionConfig {
    #[serde(default = "default_retention_enabled")]
    pub enabled: bool,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_retention_enabled() -> bool {
    true
}

fn default_sweep_interval_secs() -> u64 {
    900
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_retention_enabled(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// crewd settings.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub retention: RetentionConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 3000);
        assert!(settings.retention.enabled);
        assert_eq!(settings.retention.sweep_interval_secs, 900);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "server": { "port": 8125 } }"#).unwrap();
        assert_eq!(settings.server.port, 8125);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert!(settings.retention.enabled);
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let settings: Settings =
            serde_json::from_str(r#"{ "server": { "port": 0 } }"#).unwrap();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval_when_enabled() {
        let settings: Settings = serde_json::from_str(
            r#"{ "retention": { "enabled": true, "sweep_interval_secs": 0 } }"#,
        )
        .unwrap();
        assert!(validate_settings(&settings).is_err());

        let settings: Settings = serde_json::from_str(
            r#"{ "retention": { "enabled": false, "sweep_interval_secs": 0 } }"#,
        )
        .unwrap();
        assert!(validate_settings(&settings).is_ok());
    }
}
