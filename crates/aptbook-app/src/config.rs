//! Application configuration.
//!
//! All settings live in a single `config.toml` at
//! `~/.config/aptbook/config.toml` by default. Every field has a default,
//! so a missing file or a partial file both work; CLI flags override the
//! file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Configuration for the aptbook client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storage service settings.
    pub service: ServiceSettings,

    /// Alarm tick loop settings.
    pub alarms: AlarmSettings,

    /// Desktop notification settings.
    pub notifications: NotificationSettings,
}

/// Storage service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Base URL of the storage service.
    pub url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8099".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ServiceSettings {
    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Alarm tick loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmSettings {
    /// Seconds between alarm evaluation ticks.
    pub tick_interval_secs: u64,
}

impl Default for AlarmSettings {
    fn default() -> Self {
        Self {
            tick_interval_secs: 30,
        }
    }
}

impl AlarmSettings {
    /// The tick interval as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}

/// Desktop notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Whether reminders are delivered at all.
    pub enabled: bool,

    /// Application name shown by the notification daemon.
    pub app_name: String,

    /// Notification timeout in seconds.
    pub timeout_secs: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: "aptbook".to_string(),
            timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the default path. A missing file yields
    /// the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aptbook")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.service.url, "http://127.0.0.1:8099");
        assert_eq!(config.service.timeout(), Duration::from_secs(10));
        assert_eq!(config.alarms.tick_interval(), Duration::from_secs(30));
        assert!(config.notifications.enabled);
        assert_eq!(config.notifications.app_name, "aptbook");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nurl = \"http://calendar.lan:9000\"").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.service.url, "http://calendar.lan:9000");
        assert_eq!(config.service.timeout_secs, 10);
        assert_eq!(config.alarms.tick_interval_secs, 30);
    }

    #[test]
    fn full_file_round_trips() {
        let original = AppConfig {
            service: ServiceSettings {
                url: "http://calendar.lan:9000".to_string(),
                timeout_secs: 3,
            },
            alarms: AlarmSettings {
                tick_interval_secs: 5,
            },
            notifications: NotificationSettings {
                enabled: false,
                app_name: "test".to_string(),
                timeout_secs: 2,
            },
        };

        let text = toml::to_string(&original).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.service.url, original.service.url);
        assert_eq!(parsed.alarms.tick_interval_secs, 5);
        assert!(!parsed.notifications.enabled);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service\nurl =").unwrap();

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn default_path_ends_with_config_toml() {
        let path = AppConfig::default_path();
        assert!(path.ends_with("aptbook/config.toml"));
    }
}
