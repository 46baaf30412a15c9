//! JSON commands sent to the Pixelblaze as text frames.
//!
//! The subset of the device protocol used by this client:
//!
//! | Command                | Wire text                                   |
//! |------------------------|---------------------------------------------|
//! | list programs          | `{"listPrograms": true}`                    |
//! | activate program       | `{"activeProgramId": "<id>", "save": true}` |
//! | set brightness         | `{"brightness": <number>}`                  |
//!
//! Commands are rendered with `serde_json` through a formatter that puts a
//! space after every `:` and `,`, so the output matches the text the device
//! firmware's own web UI sends.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use thiserror::Error;

/// Errors raised while rendering a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// JSON has no representation for NaN or infinity.
    #[error("brightness must be a finite number, got {0}")]
    NonFiniteBrightness(f64),

    /// `serde_json` failed to serialize the command.
    #[error("failed to serialize command: {0}")]
    Json(#[from] serde_json::Error),

    /// The serializer produced bytes that are not UTF-8.
    #[error("serialized command is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// A control command understood by the device.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Request the program list (answered with `0x07` binary frames).
    ListPrograms,
    /// Switch the running program.  `save` persists the choice across reboots.
    SetActiveProgram { id: String, save: bool },
    /// Set global brightness, `0.0..=1.0` on the device.
    SetBrightness(f64),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListProgramsWire {
    list_programs: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetActiveProgramWire<'a> {
    active_program_id: &'a str,
    save: bool,
}

#[derive(Serialize)]
struct SetBrightnessWire {
    brightness: f64,
}

impl Command {
    /// Builds the command that activates program `id` and saves the choice.
    pub fn activate(id: impl Into<String>) -> Self {
        Command::SetActiveProgram {
            id: id.into(),
            save: true,
        }
    }

    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ListPrograms => "listPrograms",
            Command::SetActiveProgram { .. } => "activeProgramId",
            Command::SetBrightness(_) => "brightness",
        }
    }

    /// Renders the command as the exact JSON text sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NonFiniteBrightness`] for NaN/infinite
    /// brightness values, or a serialization error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pixelblaze_core::protocol::command::Command;
    ///
    /// let text = Command::activate("7").to_json().unwrap();
    /// assert_eq!(text, r#"{"activeProgramId": "7", "save": true}"#);
    /// ```
    pub fn to_json(&self) -> Result<String, CommandError> {
        match self {
            Command::ListPrograms => render(&ListProgramsWire {
                list_programs: true,
            }),
            Command::SetActiveProgram { id, save } => render(&SetActiveProgramWire {
                active_program_id: id,
                save: *save,
            }),
            Command::SetBrightness(value) => {
                if !value.is_finite() {
                    return Err(CommandError::NonFiniteBrightness(*value));
                }
                render(&SetBrightnessWire { brightness: *value })
            }
        }
    }
}

fn render<T: Serialize>(value: &T) -> Result<String, CommandError> {
    let mut buf = Vec::with_capacity(64);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Compact JSON with `": "` and `", "` separators.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
