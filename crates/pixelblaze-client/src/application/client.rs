//! PixelblazeClient: the public face of the protocol client.
//!
//! Composes the [`DeviceConnection`] with the frame decoder and catalog
//! assembler from `pixelblaze-core`:
//!
//! ```text
//! list_patterns ─► ensure_connected ─► send {"listPrograms": true}
//!                                         │
//!       ┌─────────────────────────────────┘
//!       ▼
//!   receive_frame ─► decode_frame ─► CatalogAssembler::push ─► (final?) ─► Catalog
//!       ▲                                                        │ no
//!       └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Catalog cache
//!
//! The first successful listing is cached and returned by every later call.
//! It is only dropped by [`PixelblazeClient::invalidate`] (or bypassed by
//! [`PixelblazeClient::refresh_patterns`]).  A failed listing never touches
//! the cache, and it closes the connection so that leftover frames of the
//! abandoned answer are not read by the next request.

use std::sync::Arc;

use pixelblaze_core::protocol::catalog::CatalogAssembler;
use pixelblaze_core::{decode_frame, Catalog, Command, DecodedFrame};
use tracing::{debug, info, warn};

use crate::application::connection::{ConnectionState, DeviceConnection};
use crate::application::transport::Connector;
use crate::domain::config::ClientConfig;
use crate::domain::error::ClientError;

/// Client for one Pixelblaze device.
///
/// Owned by the caller (usually the interaction shell); there is no global
/// instance.
pub struct PixelblazeClient {
    connection: DeviceConnection,
    catalog: Option<Catalog>,
    brightness_placeholder: f64,
}

impl PixelblazeClient {
    /// Creates a client for `config.url`.  No connection is opened yet.
    pub fn new(config: &ClientConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            connection: DeviceConnection::new(config.url.clone(), config.read_timeout, connector),
            catalog: None,
            brightness_placeholder: config.brightness_placeholder,
        }
    }

    /// The device URL.
    pub fn url(&self) -> &str {
        self.connection.url()
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// The cached catalog, if one has been fetched.
    pub fn cached_patterns(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Returns the pattern catalog, fetching it from the device on first use.
    ///
    /// # Errors
    ///
    /// Propagates [`ClientError::Connection`], [`ClientError::Timeout`],
    /// [`ClientError::Decode`] and [`ClientError::Parse`].  On error the cache
    /// is left as it was and the connection is closed; the next call reopens
    /// it.
    pub async fn list_patterns(&mut self) -> Result<Catalog, ClientError> {
        // Every operation goes through the lazy connect, cached or not.
        self.connection.ensure_connected().await?;

        if let Some(catalog) = &self.catalog {
            return Ok(catalog.clone());
        }

        let catalog = self.fetch_catalog().await?;
        self.catalog = Some(catalog.clone());
        Ok(catalog)
    }

    /// Drops the cached catalog so the next listing asks the device again.
    pub fn invalidate(&mut self) {
        if self.catalog.take().is_some() {
            debug!("pattern catalog invalidated");
        }
    }

    /// Fetches a fresh catalog regardless of the cache.
    ///
    /// # Errors
    ///
    /// Same as [`PixelblazeClient::list_patterns`].  The old catalog is
    /// dropped before fetching.
    pub async fn refresh_patterns(&mut self) -> Result<Catalog, ClientError> {
        self.invalidate();
        self.list_patterns().await
    }

    async fn fetch_catalog(&mut self) -> Result<Catalog, ClientError> {
        info!("fetching patterns from {}", self.connection.url());
        self.connection.send_command(&Command::ListPrograms).await?;

        match self.read_catalog().await {
            Ok(catalog) => Ok(catalog),
            Err(e) => {
                // The rest of this answer may still arrive on the socket; a
                // later listing must not read it as its own.
                warn!("program list failed, dropping connection: {e}");
                self.connection.close().await;
                Err(e)
            }
        }
    }

    async fn read_catalog(&mut self) -> Result<Catalog, ClientError> {
        let mut assembler = CatalogAssembler::new();
        while !assembler.is_complete() {
            let frame = self.connection.receive_frame().await?;
            match decode_frame(&frame)? {
                DecodedFrame::ProgramList(fragment) => {
                    debug!(
                        "program list frame: {} bytes, final={}",
                        fragment.text.len(),
                        fragment.is_final
                    );
                    assembler.push(fragment)?;
                }
                DecodedFrame::Ignored { tag } => {
                    debug!("ignoring binary frame of kind {tag:#04x}");
                }
                DecodedFrame::Text(text) => {
                    debug!("ignoring text frame while listing: {text}");
                }
            }
        }

        let frames = assembler.fragment_count();
        let catalog = assembler
            .finish()
            .ok_or_else(|| ClientError::Connection("program list ended early".to_string()))?;
        info!("received {} patterns in {frames} frames", catalog.len());
        Ok(catalog)
    }

    /// Activates program `id` and saves it as the device's startup program.
    ///
    /// No reply is awaited.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the command cannot be written.
    pub async fn set_pattern(&mut self, id: &str) -> Result<(), ClientError> {
        self.connection.send_command(&Command::activate(id)).await?;
        info!("set pattern to {id}");
        Ok(())
    }

    /// Returns the brightness to show the user.
    ///
    /// The protocol subset spoken here has no brightness query, so this is
    /// the configured placeholder (0.1 by default), not the device's value.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] if the device is unreachable.
    pub async fn get_brightness(&mut self) -> Result<f64, ClientError> {
        self.connection.ensure_connected().await?;
        Ok(self.brightness_placeholder)
    }

    /// Sets global brightness.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Command`] for a non-finite value, or
    /// [`ClientError::Connection`] if the command cannot be written.
    pub async fn set_brightness(&mut self, value: f64) -> Result<(), ClientError> {
        self.connection
            .send_command(&Command::SetBrightness(value))
            .await?;
        info!("set brightness to {value}");
        Ok(())
    }

    /// Closes the device connection.  Never fails.
    pub async fn close(&mut self) {
        self.connection.close().await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
