//! Error kinds surfaced by client operations.
//!
//! All four protocol error kinds propagate unchanged from the connection,
//! the frame decoder and the catalog parser up to the caller.  The client
//! performs no recovery of its own beyond the lazy reconnect in
//! [`crate::application::connection::DeviceConnection::ensure_connected`].

use std::time::Duration;

use pixelblaze_core::{CommandError, DecodeError, ParseError};
use thiserror::Error;

/// Errors returned by [`crate::application::client::PixelblazeClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport refused the connection or broke while in use.
    #[error("connection error: {0}")]
    Connection(String),

    /// No frame arrived within the read timeout.
    #[error("no response from device within {0:?}")]
    Timeout(Duration),

    /// A frame from the device was malformed.
    #[error("malformed frame: {0}")]
    Decode(#[from] DecodeError),

    /// The program list contained a malformed line.
    #[error("malformed pattern list: {0}")]
    Parse(#[from] ParseError),

    /// A command could not be rendered (e.g. NaN brightness).
    #[error("invalid command: {0}")]
    Command(#[from] CommandError),
}

impl ClientError {
    /// Short kind name for log lines and user-facing titles.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Connection(_) => "connection",
            ClientError::Timeout(_) => "timeout",
            ClientError::Decode(_) => "decode",
            ClientError::Parse(_) => "parse",
            ClientError::Command(_) => "command",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_converts() {
        let err: ClientError = DecodeError::TooShort(1).into();
        assert!(matches!(err, ClientError::Decode(DecodeError::TooShort(1))));
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn test_timeout_message_mentions_duration() {
        let err = ClientError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "no response from device within 5s");
    }

    #[test]
    fn test_connection_message() {
        let err = ClientError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "connection error: refused");
        assert_eq!(err.kind(), "connection");
    }
}
