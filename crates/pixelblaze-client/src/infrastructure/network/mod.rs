//! Network adapters for the transport traits in
//! [`crate::application::transport`].
//!
//! - **`websocket`** – the real device transport over `tokio-tungstenite`.
//! - **`mock`** – scripted sockets for tests.  Always compiled so the
//!   integration tests in `tests/` can use it too.

pub mod mock;
pub mod websocket;

pub use websocket::{WsConnector, WsSocket};
