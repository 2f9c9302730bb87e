//! Frame buffer for accumulating partial reads.
//!
//! Bytes read from the transport are appended as they arrive; complete
//! frames are split off the front one at a time. A single read may carry
//! zero, one or several frames plus the head of the next, so callers drain
//! [`FrameBuffer::extract_frame`] until it yields `None` before reading
//! again.
//!
//! The buffer walks length prefixes instead of searching for the first
//! `\n\n`, so a field that itself contains a blank line cannot end a frame
//! early. Fields already walked are remembered in `cursor` and are not
//! rescanned when more bytes arrive.
//!
//! When the walk hits a token that is not a valid length line, the frame
//! ends at the first `\n\n` from that token on. It is handed out as is, so
//! only the command it answers sees the decode error and the frames behind
//! it stay aligned. Only an oversized frame is an extraction error.

use std::io::{self, Read};

use bytes::{Bytes, BytesMut};

use super::{next_token, Token};
use crate::error::{Result, SsdbError};

/// Initial capacity of the accumulator
const INITIAL_CAPACITY: usize = 16 * 1024;

/// Accumulator for incoming bytes that yields complete frames
#[derive(Debug)]
pub struct FrameBuffer {
    /// Bytes received but not yet handed out as a frame
    buffer: BytesMut,

    /// Offset of the first token of the pending frame not yet walked
    cursor: usize,

    /// Largest frame accepted
    max_frame_size: usize,

    /// Reused landing area for transport reads
    scratch: Vec<u8>,
}

impl FrameBuffer {
    /// Create a frame buffer with no frame size limit
    pub fn new() -> Self {
        Self::with_max_frame_size(usize::MAX)
    }

    /// Create a frame buffer that rejects frames larger than `max_frame_size`
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(INITIAL_CAPACITY),
            cursor: 0,
            max_frame_size,
            scratch: Vec::new(),
        }
    }

    /// Append freshly read bytes
    pub fn append(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Read once from `reader` straight into the accumulator
    ///
    /// Returns the number of bytes read; `0` means end of stream.
    pub fn fill_from<R: Read>(&mut self, reader: &mut R, chunk_size: usize) -> io::Result<usize> {
        if self.scratch.len() < chunk_size {
            self.scratch.resize(chunk_size, 0);
        }

        let n = reader.read(&mut self.scratch[..chunk_size])?;
        self.buffer.extend_from_slice(&self.scratch[..n]);
        Ok(n)
    }

    /// Split off the next complete frame, terminator included
    ///
    /// Returns:
    /// - `Ok(Some(frame))` when a complete frame was buffered
    /// - `Ok(None)` when more bytes are needed; nothing is consumed
    /// - `Err(..)` when the pending frame exceeds the size limit
    ///
    /// A malformed frame still comes back as `Ok(Some(..))`; decoding it
    /// reports the problem.
    pub fn extract_frame(&mut self) -> Result<Option<Bytes>> {
        loop {
            let token = match next_token(&self.buffer, self.cursor) {
                Ok(token) => token,
                Err(e) => return self.extract_malformed(e),
            };

            match token {
                Some(Token::Field { next, .. }) => {
                    self.check_size(next)?;
                    self.cursor = next;
                }
                Some(Token::End { next }) => {
                    self.check_size(next)?;
                    self.cursor = 0;
                    return Ok(Some(self.buffer.split_to(next).freeze()));
                }
                None => {
                    self.check_size(self.buffer.len())?;
                    return Ok(None);
                }
            }
        }
    }

    /// Split off a frame whose length walk failed at `cursor`
    fn extract_malformed(&mut self, error: SsdbError) -> Result<Option<Bytes>> {
        let end = self.buffer[self.cursor..]
            .windows(2)
            .position(|pair| pair == b"\n\n")
            .map(|i| self.cursor + i + 2);

        match end {
            Some(end) => {
                self.check_size(end)?;
                tracing::debug!("Malformed {} byte frame ends at blank line: {}", end, error);
                self.cursor = 0;
                Ok(Some(self.buffer.split_to(end).freeze()))
            }
            None => {
                self.check_size(self.buffer.len())?;
                Ok(None)
            }
        }
    }

    fn check_size(&self, frame_len: usize) -> Result<()> {
        if frame_len > self.max_frame_size {
            return Err(SsdbError::Protocol(format!(
                "frame exceeds maximum size of {} bytes",
                self.max_frame_size
            )));
        }
        Ok(())
    }

    /// Get the number of buffered bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop all buffered bytes
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
