//! Client configuration types.
//!
//! [`ClientConfig`] holds everything a [`crate::application::client::PixelblazeClient`]
//! needs at construction.  It is a plain struct with no environment or file
//! reads; `main.rs` fills it from the CLI and the persisted config store.

use std::time::Duration;

/// TCP port of the device's WebSocket control endpoint.
pub const DEVICE_PORT: u16 = 81;

/// How long to wait for a frame before failing with a timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Value reported by `get_brightness`.
///
/// The protocol subset used here has no brightness query, so the client
/// reports this fixed value instead of the device's real setting.
pub const BRIGHTNESS_PLACEHOLDER: f64 = 0.1;

/// Config store key holding the device URL.
pub const DEVICE_URL_KEY: &str = "pixelblaze.url";

/// Address of a Pixelblaze running its own access point.
pub const DEFAULT_HOST: &str = "192.168.4.1";

/// Builds the control URL for a device hostname or IP address.
///
/// A value that already carries a `ws://` or `wss://` scheme is returned
/// unchanged.
///
/// # Example
///
/// ```rust
/// use pixelblaze_client::domain::device_url;
///
/// assert_eq!(device_url("pixelblaze.local"), "ws://pixelblaze.local:81/");
/// ```
pub fn device_url(host: &str) -> String {
    let host = host.trim();
    if host.starts_with("ws://") || host.starts_with("wss://") {
        host.to_string()
    } else {
        format!("ws://{host}:{DEVICE_PORT}/")
    }
}

/// Runtime settings for one client instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// WebSocket URL of the device, e.g. `ws://192.168.4.1:81/`.
    pub url: String,
    /// Read timeout applied to every frame wait (and to the connect attempt).
    pub read_timeout: Duration,
    /// Value returned by `get_brightness`.
    pub brightness_placeholder: f64,
}

impl ClientConfig {
    /// Creates a config for `url` with default timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    /// | Field                  | Default               |
    /// |------------------------|-----------------------|
    /// | url                    | `ws://192.168.4.1:81/`|
    /// | read_timeout           | 5 seconds             |
    /// | brightness_placeholder | 0.1                   |
    fn default() -> Self {
        Self {
            url: device_url(DEFAULT_HOST),
            read_timeout: DEFAULT_READ_TIMEOUT,
            brightness_placeholder: BRIGHTNESS_PLACEHOLDER,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
