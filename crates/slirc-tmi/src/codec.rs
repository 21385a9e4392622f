//! Line-based codec for tokio.
//!
//! Reads and writes CRLF-terminated lines. Decoded lines have their terminator
//! stripped; encoded lines get one appended.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::error::{self, ProtocolError};

/// Largest accepted line: 8191 bytes of IRCv3 tags plus a 512-byte body.
pub const MAX_LINE_LEN: usize = 8191 + 512;

/// Newline-delimited UTF-8 line codec.
///
/// A line that is too long, not UTF-8, or carries a NUL is dropped and logged;
/// decoding resumes with the next line. `Framed` ends the stream after the
/// first decode error, so only I/O failures surface as errors.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
    /// Skipping the tail of an over-long line until its terminator arrives.
    discarding: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Codec with the default [`MAX_LINE_LEN`] limit.
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Codec with a custom line length limit (terminator included).
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Validate that a string contains no NUL bytes.
    pub(crate) fn validate_line(s: &str) -> error::Result<()> {
        if s.contains('\0') {
            return Err(ProtocolError::IllegalControlChar('\0'));
        }
        Ok(())
    }

    /// Turn one terminated line into its text, or say why it is unusable.
    fn check_line(&self, line: &[u8]) -> error::Result<String> {
        if line.len() > self.max_len {
            return Err(ProtocolError::LineTooLong {
                actual: line.len(),
                limit: self.max_len,
            });
        }

        let data = std::str::from_utf8(line).map_err(|e| ProtocolError::InvalidUtf8 {
            byte_pos: e.valid_up_to(),
            details: e.to_string(),
            command_hint: error::extract_command_hint(line),
        })?;

        let data = data.trim_end_matches(['\r', '\n']);
        Self::validate_line(data)?;
        Ok(data.to_string())
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                self.next_index = src.len();
                if src.len() > self.max_len {
                    debug!(
                        buffered = src.len(),
                        limit = self.max_len,
                        "dropping over-long line"
                    );
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                }
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if std::mem::take(&mut self.discarding) {
                continue;
            }

            match self.check_line(&line) {
                Ok(data) => return Ok(Some(data)),
                Err(e) => debug!(error = %e, "dropping malformed line"),
            }
        }
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> error::Result<()> {
        let line = line.as_ref().trim_end_matches(['\r', '\n']);
        dst.reserve(line.len() + 2);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}
