//! Key/value settings store used by the interaction shell.
//!
//! The shell only needs two things from persistent storage: "what is the
//! device URL?" and "remember this device URL".  Keeping that behind a small
//! trait lets the shell be tested with a mock store while the binary uses the
//! TOML file in `infrastructure::storage`.

use thiserror::Error;

/// Error raised when a value cannot be persisted.
#[derive(Debug, Error)]
#[error("failed to persist {key}: {reason}")]
pub struct StoreError {
    pub key: String,
    pub reason: String,
}

/// String key/value settings that survive a restart.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore {
    /// Returns the value stored under `key`, or `None` if it was never set.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` and persists it immediately.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the value could not be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}
