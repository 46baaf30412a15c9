//! Transport seams used by the device connection.
//!
//! The application layer never names a WebSocket type.  It talks to the
//! device through two traits:
//!
//! - [`Connector`] opens a new [`Socket`] to a URL.
//! - [`Socket`] sends and receives whole frames and reports whether it is
//!   still open.
//!
//! The production implementation (`tokio-tungstenite`) lives in
//! `infrastructure::network::websocket`; tests use the scripted doubles in
//! `infrastructure::network::mock`.

use async_trait::async_trait;
use pixelblaze_core::RawFrame;

use crate::domain::error::ClientError;

/// One open, message-oriented connection to the device.
#[async_trait]
pub trait Socket: Send {
    /// Returns `false` once the transport has observed the connection closing
    /// (close frame, EOF, or a fatal transport error).
    fn is_open(&self) -> bool;

    /// Writes one frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the transport rejects the write.
    async fn send(&mut self, frame: RawFrame) -> Result<(), ClientError>;

    /// Waits for the next text or binary frame.  Control frames (ping/pong)
    /// are handled by the transport and never returned.
    ///
    /// This call has no timeout of its own.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] on transport failure or when the
    /// device closes the connection.
    async fn recv(&mut self) -> Result<RawFrame, ClientError>;

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the close handshake fails.
    async fn close(&mut self) -> Result<(), ClientError>;
}

/// Factory for [`Socket`]s.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Opens a new connection to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the device is unreachable or the
    /// handshake fails.
    async fn connect(&self, url: &str) -> Result<Box<dyn Socket>, ClientError>;
}
