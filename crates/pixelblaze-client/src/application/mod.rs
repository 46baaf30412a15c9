//! Application layer use cases for pixelblaze-client.
//!
//! # What lives here?
//!
//! - **`transport`** – the `Connector` / `Socket` traits the client talks
//!   through.  Implemented in `infrastructure::network`.
//!
//! - **`connection`** – `DeviceConnection`: one lazily opened socket,
//!   replaced transparently when it reports closed, with the read timeout.
//!
//! - **`client`** – `PixelblazeClient`: list patterns (cached), activate a
//!   pattern, get and set brightness.
//!
//! - **`store`** – the `ConfigStore` trait for persisted settings.
//!
//! - **`shell`** – the menu loop that drives the client through a
//!   `UserInterface`.

pub mod client;
pub mod connection;
pub mod shell;
pub mod store;
pub mod transport;

pub use client::PixelblazeClient;
pub use connection::{ConnectionState, DeviceConnection};
pub use shell::{Action, Shell, UserInterface};
pub use store::{ConfigStore, StoreError};
pub use transport::{Connector, Socket};
