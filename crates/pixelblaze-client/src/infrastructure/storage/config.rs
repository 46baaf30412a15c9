//! TOML-based persistence for the `pixelblaze` settings.
//!
//! Reads and writes [`AppConfig`] to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Pixelblaze\config.toml`
//! - Linux:    `~/.config/pixelblaze/config.toml`
//! - macOS:    `~/Library/Application Support/Pixelblaze/config.toml`
//!
//! Example file:
//!
//! ```toml
//! [general]
//! log_level = "info"
//! read_timeout_secs = 5
//!
//! [store]
//! "pixelblaze.url" = "ws://192.168.4.1:81/"
//! ```
//!
//! The `[store]` table is a flat string map behind the
//! [`ConfigStore`] trait; the shell keeps the device URL there.
//! Fields annotated with `#[serde(default = "...")]` fall back to their
//! default when missing, so a first run without a file works.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::application::store::{ConfigStore, StoreError};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field parsed but holds an unusable value.
    #[error("invalid {field} in config: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    /// Free-form string settings, e.g. `pixelblaze.url`.
    #[serde(default)]
    pub store: BTreeMap<String, String>,
}

/// Process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Seconds to wait for a device response.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_read_timeout_secs() -> u64 {
    5
}

impl GeneralConfig {
    /// Rejects values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero `read_timeout_secs`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.read_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "read_timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist yet.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed, and
/// [`ConfigError::Invalid`] if a value is out of range.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let config: AppConfig = toml::from_str(&content)?;
            config.general.validate()?;
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no config at {}; using defaults", path.display());
            Ok(AppConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory, including the `Pixelblaze`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Pixelblaze"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("pixelblaze"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Pixelblaze")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── File-backed store ─────────────────────────────────────────────────────────

/// [`ConfigStore`] backed by a TOML file.  Every `set` rewrites the file.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    config: AppConfig,
}

impl FileConfigStore {
    /// Loads the store from `path` (missing file means empty store).
    ///
    /// # Errors
    ///
    /// See [`load_config_from`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = load_config_from(&path)?;
        Ok(Self { path, config })
    }

    /// Loads the store from the platform default location.
    ///
    /// # Errors
    ///
    /// See [`config_file_path`] and [`load_config_from`].
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(config_file_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.config.store.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.config.store.insert(key.to_string(), value.to_string());
        save_config_to(&self.path, &self.config).map_err(|e| StoreError {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        debug!("stored {} in {}", key, self.path.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::DEVICE_URL_KEY;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pixelblaze-test-{}-{name}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_default_config_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.general.log_level, "info");
        assert_eq!(cfg.general.read_timeout_secs, 5);
        assert!(cfg.store.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        // Arrange
        let text = "[general]\nlog_level = \"debug\"\n";

        // Act
        let cfg: AppConfig = toml::from_str(text).unwrap();

        // Assert
        assert_eq!(cfg.general.log_level, "debug");
        assert_eq!(cfg.general.read_timeout_secs, 5);
        assert!(cfg.store.is_empty());
    }

    #[test]
    fn test_dotted_store_key_is_read_as_one_key() {
        let text = "[store]\n\"pixelblaze.url\" = \"ws://lights:81/\"\n";

        let cfg: AppConfig = toml::from_str(text).unwrap();

        assert_eq!(
            cfg.store.get(DEVICE_URL_KEY).map(String::as_str),
            Some("ws://lights:81/")
        );
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let path = temp_path("missing");

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let path = temp_path("malformed");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[general\nlog_level = ").unwrap();

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_zero_read_timeout_is_rejected() {
        // Arrange
        let path = temp_path("zero-timeout");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[general]\nread_timeout_secs = 0\n").unwrap();

        // Act
        let result = load_config_from(&path);

        // Assert
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "read_timeout_secs",
                ..
            })
        ));
        assert!(FileConfigStore::open(&path).is_err());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_set_persists_immediately() {
        // Arrange
        let path = temp_path("persist");
        let mut store = FileConfigStore::open(&path).unwrap();

        // Act
        store.set(DEVICE_URL_KEY, "ws://10.0.0.7:81/").unwrap();
        let reopened = FileConfigStore::open(&path).unwrap();

        // Assert
        assert_eq!(
            reopened.get(DEVICE_URL_KEY).as_deref(),
            Some("ws://10.0.0.7:81/")
        );
        assert_eq!(reopened.get("unknown"), None);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_keeps_general_section_on_set() {
        let path = temp_path("general");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[general]\nread_timeout_secs = 9\n").unwrap();
        let mut store = FileConfigStore::open(&path).unwrap();

        store.set("other", "value").unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.general.read_timeout_secs, 9);
        assert_eq!(cfg.store.get("other").map(String::as_str), Some("value"));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_config_file_path_ends_with_app_dir() {
        if let Ok(path) = config_file_path() {
            assert!(path.ends_with("pixelblaze/config.toml"));
        }
    }
}
