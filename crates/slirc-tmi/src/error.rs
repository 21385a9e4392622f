//! Error types for the TMI wire layer.
//!
//! Line-level failures (framing, encoding, control characters) are reported as
//! [`ProtocolError`]. Scanner failures are [`LineParseError`] and are expected
//! traffic for callers that only care about a few line shapes.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Extract the command token from raw line bytes (for error reporting).
///
/// Skips an optional `@tags` block and `:prefix`, then returns the first run
/// of ASCII alphanumerics. Works on bytes so it can run before UTF-8
/// validation has succeeded.
pub(crate) fn extract_command_hint(raw_line: &[u8]) -> Option<String> {
    let mut pos = 0;

    for sigil in [b'@', b':'] {
        if raw_line.get(pos) == Some(&sigil) {
            while pos < raw_line.len() && raw_line[pos] != b' ' {
                pos += 1;
            }
            if raw_line.get(pos) == Some(&b' ') {
                pos += 1;
            }
        }
    }

    let start = pos;
    while pos < raw_line.len() && raw_line[pos].is_ascii_alphanumeric() {
        pos += 1;
    }

    if pos > start {
        String::from_utf8(raw_line[start..pos].to_vec()).ok()
    } else {
        None
    }
}

/// Line-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 bytes in a line.
    #[error("invalid UTF-8 in line at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
        /// Detailed error message from the UTF-8 decoder.
        details: String,
        /// Command token recovered from the raw bytes, if any.
        command_hint: Option<String>,
    },

    /// Line exceeded the maximum allowed length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Illegal control character in a line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),
}

/// Reasons the line scanner rejects input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LineParseError {
    /// Input was empty (or only line terminators).
    #[error("empty line")]
    EmptyLine,

    /// No valid command token where one was expected.
    #[error("invalid command token at byte {position}")]
    InvalidCommand {
        /// Byte offset of the rejected token.
        position: usize,
    },
}
