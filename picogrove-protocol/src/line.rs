//! Line framing for the serial command channel.
//!
//! Commands arrive as UTF-8 text terminated by `\n`. A trailing `\r` is
//! left in place; the call parser trims surrounding whitespace anyway.
//! Lines longer than [`MAX_LINE_LEN`] are dropped up to the next newline
//! and reported once as [`FramingError::LineTooLong`].

use heapless::{String, Vec};

use crate::error::FramingError;

/// Line terminator
pub const LINE_END: u8 = b'\n';

/// Maximum accepted line length in bytes (excluding the terminator)
pub const MAX_LINE_LEN: usize = 256;

/// A complete received line
pub type Line = String<MAX_LINE_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Accumulating bytes of the current line
    Collecting,
    /// Current line overflowed; skipping until the next terminator
    Discarding,
}

/// State machine for splitting a byte stream into lines
#[derive(Debug, Clone)]
pub struct LineParser {
    state: ParseState,
    buffer: Vec<u8, MAX_LINE_LEN>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self {
            state: ParseState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser state, dropping any partial line
    pub fn reset(&mut self) {
        self.state = ParseState::Collecting;
        self.buffer.clear();
    }

    /// Number of bytes buffered for the current line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a line,
    /// `Ok(None)` when more bytes are needed, or `Err` when the completed
    /// line was too long or not valid UTF-8.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, FramingError> {
        match self.state {
            ParseState::Discarding => {
                if byte == LINE_END {
                    self.reset();
                    return Err(FramingError::LineTooLong);
                }
                Ok(None)
            }
            ParseState::Collecting => {
                if byte == LINE_END {
                    let line = self.take_line();
                    self.reset();
                    return line.map(Some);
                }
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.state = ParseState::Discarding;
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete line (or framing error) and the number
    /// of bytes consumed. Bytes after a complete line are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Result<Option<Line>, FramingError>) {
        for (idx, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                other => return (idx + 1, other),
            }
        }
        (bytes.len(), Ok(None))
    }

    fn take_line(&self) -> Result<Line, FramingError> {
        let text = core::str::from_utf8(&self.buffer).map_err(|_| FramingError::InvalidUtf8)?;
        let mut line = Line::new();
        line.push_str(text).map_err(|_| FramingError::LineTooLong)?;
        Ok(line)
    }
}
