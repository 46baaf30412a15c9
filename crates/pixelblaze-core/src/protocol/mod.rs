//! Protocol module: frame classification, program-list reassembly and
//! command encoding.

pub mod catalog;
pub mod command;
pub mod frame;

pub use catalog::{AssemblyState, CatalogAssembler, ParseError};
pub use command::{Command, CommandError};
pub use frame::{decode_frame, DecodeError, DecodedFrame, ProgramListFragment, RawFrame};
