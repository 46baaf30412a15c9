//! Storage infrastructure: the settings file.
//!
//! The `config` sub-module reads and writes the TOML file in the platform
//! config directory and exposes it to the shell as a
//! [`crate::application::store::ConfigStore`].

pub mod config;

pub use config::{AppConfig, ConfigError, FileConfigStore};
