//! pixelblaze-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What is a Pixelblaze? (for beginners)
//!
//! A Pixelblaze is a Wi-Fi LED controller.  It stores a set of lighting
//! *patterns* (small programs) and runs one at a time.  It is controlled over
//! a WebSocket on port 81: JSON commands go out as text frames, and larger
//! answers such as the pattern list come back as binary frames.
//!
//! This crate:
//!
//! 1. Opens the WebSocket lazily and reopens it when the device drops it.
//! 2. Lists the stored patterns, sorted by name, and caches the list.
//! 3. Activates a pattern and sets the global brightness.
//! 4. Drives all of that from a small terminal menu (`pixelblaze` binary).
//!
//! Frame decoding, catalog parsing and command encoding live in the
//! I/O-free `pixelblaze-core` crate.

/// Domain layer: configuration and error types.
pub mod domain;

/// Application layer: connection, client, settings store and shell.
pub mod application;

/// Infrastructure layer: WebSocket transport, settings file, terminal UI.
pub mod infrastructure;

pub use application::client::PixelblazeClient;
pub use domain::{ClientConfig, ClientError};
