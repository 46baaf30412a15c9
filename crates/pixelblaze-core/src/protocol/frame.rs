//! Frame decoder for messages received from the Pixelblaze.
//!
//! The device answers commands over a message-oriented socket.  Each message
//! ("frame") is either a text frame (JSON acknowledgements and status) or a
//! binary frame carrying structured data.  Binary frames share a two-byte
//! header:
//!
//! ```text
//! [kind:1][flags:1][payload:N]
//! ```
//!
//! - `kind`  – what the payload contains.  `0x07` is a fragment of the program
//!   list; other values (preview pixels, expander config, ...) exist on the
//!   wire but are not used by this client.
//! - `flags` – bit `0x04` marks the last frame of a multi-frame response.
//! - `payload` – for the program list, UTF-8 text.
//!
//! The decoder only classifies frames; reassembly of program-list fragments
//! lives in [`crate::protocol::catalog`].

use thiserror::Error;

/// Binary frame kind tag for a program-list fragment.
pub const PROGRAM_LIST_TAG: u8 = 0x07;

/// Flags bit set on the final frame of a multi-frame response.
pub const FINAL_FRAME_FLAG: u8 = 0x04;

/// Size of the binary frame header (kind + flags).
pub const BINARY_HEADER_SIZE: usize = 2;

/// Errors raised while classifying a raw frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A binary frame did not contain the two header bytes.
    #[error("binary frame too short: need at least {BINARY_HEADER_SIZE} bytes, got {0}")]
    TooShort(usize),

    /// A program-list payload was not valid UTF-8.
    #[error("program list payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// One message as delivered by the transport, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFrame {
    /// A text (UTF-8) message.
    Text(String),
    /// A binary message, header included.
    Binary(Vec<u8>),
}

/// A classified frame.  Borrows from the [`RawFrame`] it was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedFrame<'a> {
    /// Text frame passed through unchanged.
    Text(&'a str),
    /// A fragment of the program list.
    ProgramList(ProgramListFragment<'a>),
    /// A binary frame of a kind this client does not use.
    Ignored {
        /// The kind tag found in byte 0.
        tag: u8,
    },
}

/// Payload of one program-list frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramListFragment<'a> {
    /// Newline-separated `"<id>\t<name>"` lines.
    pub text: &'a str,
    /// `true` when no further fragments belong to this response.
    pub is_final: bool,
}

/// Classifies `frame` and extracts the program-list payload if present.
///
/// # Errors
///
/// Returns [`DecodeError::TooShort`] for a binary frame with fewer than two
/// bytes, and [`DecodeError::InvalidUtf8`] when a program-list payload is not
/// valid UTF-8.
///
/// # Examples
///
/// ```rust
/// use pixelblaze_core::protocol::frame::{decode_frame, DecodedFrame, RawFrame};
///
/// let frame = RawFrame::Binary(b"\x07\x04abc\tFire".to_vec());
/// match decode_frame(&frame).unwrap() {
///     DecodedFrame::ProgramList(fragment) => {
///         assert_eq!(fragment.text, "abc\tFire");
///         assert!(fragment.is_final);
///     }
///     other => panic!("unexpected frame: {other:?}"),
/// }
/// ```
pub fn decode_frame(frame: &RawFrame) -> Result<DecodedFrame<'_>, DecodeError> {
    match frame {
        RawFrame::Text(text) => Ok(DecodedFrame::Text(text)),
        RawFrame::Binary(bytes) => decode_binary(bytes),
    }
}

fn decode_binary(bytes: &[u8]) -> Result<DecodedFrame<'_>, DecodeError> {
    if bytes.len() < BINARY_HEADER_SIZE {
        return Err(DecodeError::TooShort(bytes.len()));
    }

    let tag = bytes[0];
    if tag != PROGRAM_LIST_TAG {
        return Ok(DecodedFrame::Ignored { tag });
    }

    let flags = bytes[1];
    let text = std::str::from_utf8(&bytes[BINARY_HEADER_SIZE..])?;
    Ok(DecodedFrame::ProgramList(ProgramListFragment {
        text,
        is_final: flags & FINAL_FRAME_FLAG != 0,
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
