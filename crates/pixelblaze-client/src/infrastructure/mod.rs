//! Infrastructure layer for pixelblaze-client.
//!
//! Adapters between the application layer and the outside world.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain` and
//! `pixelblaze_core`, but MUST NOT be imported by the `application` or
//! `domain` layers (tests aside).
//!
//! # Sub-modules
//!
//! - **`network`** – `tokio-tungstenite` implementation of `Connector` and
//!   `Socket`, plus the scripted doubles used by tests.
//!
//! - **`storage`** – the TOML settings file behind `ConfigStore`.
//!
//! - **`terminal`** – stdin/stdout implementation of `UserInterface`.

pub mod network;
pub mod storage;
pub mod terminal;
