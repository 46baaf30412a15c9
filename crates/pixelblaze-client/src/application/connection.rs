//! DeviceConnection: owns the socket to one Pixelblaze.
//!
//! The connection is *lazy*.  Nothing is opened until the first operation
//! needs the device, and a socket that has reported itself closed is replaced
//! by a fresh one on the next operation.  A healthy socket is never closed or
//! replaced.
//!
//! # Connection lifecycle
//!
//! ```text
//! Uninitialized ──ensure_connected──►  Connected
//!                                        │   ▲
//!                      socket reports    │   │ ensure_connected
//!                      closed            ▼   │ (transparent reconnect)
//!                                      Disconnected
//! ```
//!
//! There is exactly one reconnect attempt per operation.  If it fails the
//! error goes straight back to the caller; there is no retry loop or backoff.
//!
//! # Concurrency
//!
//! Every method takes `&mut self`, so the borrow checker guarantees a single
//! outstanding request per connection.  No locking is needed.

use std::sync::Arc;
use std::time::Duration;

use pixelblaze_core::{Command, RawFrame};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::application::transport::{Connector, Socket};
use crate::domain::error::ClientError;

/// Observable state of a [`DeviceConnection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection has ever been opened.
    Uninitialized,
    /// A socket is held and reports open.
    Connected,
    /// The last socket reported closed (or was closed by `close`).
    Disconnected,
}

/// The single socket to one device, reconnected on demand.
pub struct DeviceConnection {
    url: String,
    read_timeout: Duration,
    connector: Arc<dyn Connector>,
    socket: Option<Box<dyn Socket>>,
    connects: u64,
}

impl DeviceConnection {
    /// Creates a connection to `url` without opening it.
    pub fn new(url: impl Into<String>, read_timeout: Duration, connector: Arc<dyn Connector>) -> Self {
        Self {
            url: url.into(),
            read_timeout,
            connector,
            socket: None,
            connects: 0,
        }
    }

    /// The device URL this connection targets.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The read timeout applied by [`DeviceConnection::receive_frame`].
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Number of sockets opened so far.
    pub fn connect_count(&self) -> u64 {
        self.connects
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        match &self.socket {
            Some(socket) if socket.is_open() => ConnectionState::Connected,
            _ if self.connects == 0 => ConnectionState::Uninitialized,
            _ => ConnectionState::Disconnected,
        }
    }

    /// Returns the live socket, opening a new one if there is none or the
    /// current one reports closed.
    ///
    /// The connect attempt is bounded by the read timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the device cannot be reached.
    pub async fn ensure_connected(&mut self) -> Result<&mut (dyn Socket + 'static), ClientError> {
        let healthy = self.socket.as_ref().is_some_and(|s| s.is_open());

        if !healthy {
            if self.socket.take().is_some() {
                info!("connection to {} closed; reconnecting", self.url);
            }

            let socket = timeout(self.read_timeout, self.connector.connect(&self.url))
                .await
                .map_err(|_| {
                    ClientError::Connection(format!(
                        "timed out connecting to {} after {:?}",
                        self.url, self.read_timeout
                    ))
                })??;

            self.connects += 1;
            info!("connected to {}", self.url);
            self.socket = Some(socket);
        }

        self.socket
            .as_deref_mut()
            .ok_or_else(|| ClientError::Connection("no socket after connect".to_string()))
    }

    /// Renders `command` and sends it as a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Command`] if the command cannot be rendered, or
    /// [`ClientError::Connection`] if connecting or writing fails.
    pub async fn send_command(&mut self, command: &Command) -> Result<(), ClientError> {
        let text = command.to_json()?;
        debug!("sending {} command: {text}", command.name());
        self.send_frame(RawFrame::Text(text)).await
    }

    /// Sends a raw frame on the live socket.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if connecting or writing fails.
    pub async fn send_frame(&mut self, frame: RawFrame) -> Result<(), ClientError> {
        let socket = self.ensure_connected().await?;
        socket.send(frame).await
    }

    /// Waits for the next frame on the current socket.
    ///
    /// This never opens a connection: a response can only arrive on the
    /// socket the request was sent on.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] if nothing arrives within the read
    /// timeout, or [`ClientError::Connection`] if there is no open socket or
    /// the transport fails.
    pub async fn receive_frame(&mut self) -> Result<RawFrame, ClientError> {
        let read_timeout = self.read_timeout;
        let socket = self
            .socket
            .as_deref_mut()
            .filter(|s| s.is_open())
            .ok_or_else(|| ClientError::Connection("not connected".to_string()))?;

        match timeout(read_timeout, socket.recv()).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout(read_timeout)),
        }
    }

    /// Closes the socket if one is held.  Never fails: close errors are
    /// logged and dropped.
    pub async fn close(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            match socket.close().await {
                Ok(()) => debug!("closed connection to {}", self.url),
                Err(e) => warn!("couldn't close connection to {} cleanly: {e}", self.url),
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
