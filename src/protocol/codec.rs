//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ```text
//! <decimal length>\n<raw bytes>\n   ... one block per field
//! \n                                ... blank line ends the frame
//! ```
//!
//! Field bytes are never escaped. Decoding honours the length prefix, so a
//! field may contain any byte, `\n` included.

use std::ops::Range;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, SsdbError};

/// Longest length line accepted (u64::MAX has 20 digits)
const MAX_LENGTH_DIGITS: usize = 20;

// =============================================================================
// Encoding
// =============================================================================

/// Incremental builder for one request frame
///
/// ```
/// use ssdb_client::protocol::FrameEncoder;
///
/// let frame = FrameEncoder::new().arg("get").arg("test").finish();
/// assert_eq!(&frame[..], b"3\nget\n4\ntest\n\n");
/// ```
#[derive(Debug, Default)]
pub struct FrameEncoder {
    buf: BytesMut,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one raw field
    pub fn arg(mut self, arg: impl AsRef<[u8]>) -> Self {
        let arg = arg.as_ref();
        let len = arg.len().to_string();

        self.buf.reserve(len.len() + arg.len() + 2);
        self.buf.put_slice(len.as_bytes());
        self.buf.put_u8(b'\n');
        self.buf.put_slice(arg);
        self.buf.put_u8(b'\n');
        self
    }

    /// Append a signed integer as its decimal text
    pub fn int(self, value: i64) -> Self {
        self.arg(value.to_string())
    }

    /// Append an unsigned integer as its decimal text
    pub fn uint(self, value: u64) -> Self {
        self.arg(value.to_string())
    }

    /// Append an optional integer; `None` is sent as an empty field
    pub fn opt_int(self, value: Option<i64>) -> Self {
        match value {
            Some(v) => self.int(v),
            None => self.arg(""),
        }
    }

    /// Terminate the frame with the blank line
    pub fn finish(mut self) -> Bytes {
        self.buf.put_u8(b'\n');
        self.buf.freeze()
    }
}

/// Encode an ordered argument list into one frame
pub fn encode_frame<A: AsRef<[u8]>>(args: &[A]) -> Bytes {
    args.iter()
        .fold(FrameEncoder::new(), |encoder, arg| encoder.arg(arg))
        .finish()
}

// =============================================================================
// Decoding
// =============================================================================

/// One step of a frame walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A field's data occupies `data`; the next token starts at `next`
    Field { data: Range<usize>, next: usize },

    /// The terminating blank line; the frame ends just before `next`
    End { next: usize },
}

/// Read the token starting at `pos`
///
/// Returns `Ok(None)` when `buf` ends before the token does.
pub(crate) fn next_token(buf: &[u8], pos: usize) -> Result<Option<Token>> {
    let rest = &buf[pos..];

    let newline = match rest.iter().position(|&b| b == b'\n') {
        Some(i) => i,
        None => {
            if rest.len() > MAX_LENGTH_DIGITS + 1 {
                return Err(SsdbError::Protocol(format!(
                    "length line exceeds {} bytes",
                    MAX_LENGTH_DIGITS
                )));
            }
            return Ok(None);
        }
    };

    let line = strip_cr(&rest[..newline]);
    let line_end = pos + newline + 1;

    if line.is_empty() {
        return Ok(Some(Token::End { next: line_end }));
    }

    let len = parse_length(line)?;
    let start = line_end;
    let end = start
        .checked_add(len)
        .ok_or_else(|| SsdbError::Protocol(format!("field length {} overflows", len)))?;

    // Data plus at least one terminator byte must be present
    if buf.len() <= end {
        return Ok(None);
    }

    let next = match buf[end] {
        b'\n' => end + 1,
        b'\r' if buf.len() <= end + 1 => return Ok(None),
        b'\r' if buf[end + 1] == b'\n' => end + 2,
        other => {
            return Err(SsdbError::Protocol(format!(
                "field of {} bytes not followed by newline (found 0x{:02x})",
                len, other
            )))
        }
    };

    Ok(Some(Token::Field { data: start..end, next }))
}

/// Decode a complete frame into its ordered fields
///
/// Stops at the terminating blank line. Fields are returned uninterpreted
/// and share memory with `frame`.
pub fn decode_frame(frame: Bytes) -> Result<Vec<Bytes>> {
    let mut fields = Vec::new();
    let mut pos = 0;

    loop {
        match next_token(&frame, pos)? {
            Some(Token::Field { data, next }) => {
                fields.push(frame.slice(data));
                pos = next;
            }
            Some(Token::End { .. }) => return Ok(fields),
            None => {
                return Err(SsdbError::Protocol(format!(
                    "frame truncated after {} fields ({} bytes)",
                    fields.len(),
                    frame.len()
                )))
            }
        }
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    match line.last() {
        Some(b'\r') => &line[..line.len() - 1],
        _ => line,
    }
}

fn parse_length(line: &[u8]) -> Result<usize> {
    if line.len() > MAX_LENGTH_DIGITS || !line.iter().all(u8::is_ascii_digit) {
        return Err(SsdbError::Protocol(format!(
            "invalid length prefix {:?}",
            String::from_utf8_lossy(line)
        )));
    }

    // All ASCII digits, so the only failure left is overflow
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| {
            SsdbError::Protocol(format!(
                "length prefix {} out of range",
                String::from_utf8_lossy(line)
            ))
        })
}
