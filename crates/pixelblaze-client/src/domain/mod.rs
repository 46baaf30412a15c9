//! Domain layer for pixelblaze-client.
//!
//! Plain types with no I/O: the client configuration and the error kinds
//! every client operation can fail with.
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `TcpStream`, or `WebSocket` types
//! - File I/O or environment variable reading

pub mod config;
pub mod error;

pub use config::{device_url, ClientConfig};
pub use error::ClientError;
