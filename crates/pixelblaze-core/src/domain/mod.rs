//! Domain entities for the Pixelblaze protocol client.
//!
//! Pure data types with no I/O: the device's lighting programs ([`Pattern`])
//! and the sorted list of them ([`Catalog`]).

pub mod pattern;

pub use pattern::{Catalog, Pattern};
