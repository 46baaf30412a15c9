//! # pixelblaze-core
//!
//! Shared library for the Pixelblaze remote containing the control-protocol
//! codec and the domain entities.
//!
//! This crate has no I/O: it never opens a socket or reads a file.  The
//! network client in `pixelblaze-client` feeds it raw frames and sends the
//! command text it produces.
//!
//! # Architecture overview
//!
//! A Pixelblaze is a WiFi LED controller that runs lighting programs
//! ("patterns").  It exposes a WebSocket on port 81.  Commands are JSON text
//! frames; structured replies come back as binary frames with a two-byte
//! header.
//!
//! - **`protocol`** – Classifies incoming frames (`frame`), reassembles the
//!   multi-frame program list (`catalog`) and renders outgoing commands
//!   (`command`).
//!
//! - **`domain`** – [`Pattern`] and the sorted [`Catalog`].

pub mod domain;
pub mod protocol;

pub use domain::pattern::{Catalog, Pattern};
pub use protocol::catalog::{CatalogAssembler, ParseError};
pub use protocol::command::{Command, CommandError};
pub use protocol::frame::{decode_frame, DecodeError, DecodedFrame, RawFrame};
