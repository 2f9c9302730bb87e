//! Response definitions
//!
//! Turns the fields of one reply frame into a typed [`Reply`], guided by
//! the [`ReplyShape`] of the command that produced it.

use bytes::Bytes;

use super::ReplyShape;
use crate::error::{Result, SsdbError};

/// Status token of a successful reply
pub const STATUS_OK: &str = "ok";

/// A decoded reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Reply {
    /// Success with nothing to return
    #[default]
    Void,

    /// A single value
    Scalar(Bytes),

    /// A single integer
    Integer(i64),

    /// An ordered list of values
    List(Vec<Bytes>),

    /// Ordered key/value pairs, in wire order
    Map(Vec<(Bytes, Bytes)>),

    /// Ordered key/score pairs, in wire order
    ScoreMap(Vec<(Bytes, i64)>),
}

/// Decode the fields of one reply frame
///
/// field[0] must be the `ok` status token (any case). Any other token is
/// returned as [`SsdbError::Server`] with field[1] as its message, if sent.
pub fn decode_reply(shape: ReplyShape, fields: Vec<Bytes>) -> Result<Reply> {
    let mut fields = fields.into_iter();

    let status = fields
        .next()
        .ok_or_else(|| SsdbError::Protocol("reply has no status token".to_string()))?;

    if !status.eq_ignore_ascii_case(STATUS_OK.as_bytes()) {
        return Err(SsdbError::Server {
            status: String::from_utf8_lossy(&status).into_owned(),
            message: fields.next().map(|m| String::from_utf8_lossy(&m).into_owned()),
        });
    }

    let body: Vec<Bytes> = fields.collect();

    match shape {
        ReplyShape::Void => Ok(Reply::Void),
        ReplyShape::Scalar => single(body).map(Reply::Scalar),
        ReplyShape::Integer => single(body).and_then(|f| parse_int(&f)).map(Reply::Integer),
        ReplyShape::List => Ok(Reply::List(body)),
        ReplyShape::Map => pairs(body).map(Reply::Map),
        ReplyShape::ScoreMap => pairs(body)?
            .into_iter()
            .map(|(key, score)| Ok((key, parse_int(&score)?)))
            .collect::<Result<Vec<_>>>()
            .map(Reply::ScoreMap),
    }
}

fn single(body: Vec<Bytes>) -> Result<Bytes> {
    if body.len() != 1 {
        return Err(SsdbError::Decode(format!(
            "expected exactly 1 field after status, got {}",
            body.len()
        )));
    }
    Ok(body.into_iter().next().unwrap_or_default())
}

fn pairs(body: Vec<Bytes>) -> Result<Vec<(Bytes, Bytes)>> {
    if body.len() % 2 != 0 {
        return Err(SsdbError::Protocol(format!(
            "expected key/value pairs, got odd field count {}",
            body.len()
        )));
    }

    let mut out = Vec::with_capacity(body.len() / 2);
    let mut fields = body.into_iter();
    while let (Some(key), Some(value)) = (fields.next(), fields.next()) {
        out.push((key, value));
    }
    Ok(out)
}

/// Parse a decimal integer field; never defaults
fn parse_int(field: &[u8]) -> Result<i64> {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(|| {
            SsdbError::Decode(format!(
                "expected integer, got {:?}",
                String::from_utf8_lossy(field)
            ))
        })
}

// =============================================================================
// Typed Accessors
// =============================================================================

impl Reply {
    fn mismatch(&self, expected: &str) -> SsdbError {
        SsdbError::Decode(format!("expected {} reply, got {:?}", expected, self))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Reply::Void)
    }

    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            Reply::Scalar(value) => Ok(value),
            other => Err(other.mismatch("scalar")),
        }
    }

    pub fn into_int(self) -> Result<i64> {
        match self {
            Reply::Integer(value) => Ok(value),
            Reply::Scalar(value) => parse_int(&value),
            other => Err(other.mismatch("integer")),
        }
    }

    pub fn into_list(self) -> Result<Vec<Bytes>> {
        match self {
            Reply::List(values) => Ok(values),
            other => Err(other.mismatch("list")),
        }
    }

    pub fn into_pairs(self) -> Result<Vec<(Bytes, Bytes)>> {
        match self {
            Reply::Map(pairs) => Ok(pairs),
            other => Err(other.mismatch("map")),
        }
    }

    pub fn into_scores(self) -> Result<Vec<(Bytes, i64)>> {
        match self {
            Reply::ScoreMap(pairs) => Ok(pairs),
            Reply::Map(pairs) => pairs
                .into_iter()
                .map(|(key, score)| Ok((key, parse_int(&score)?)))
                .collect(),
            other => Err(other.mismatch("score map")),
        }
    }
}

/// Conversion from a decoded reply into a caller-facing type
///
/// `Default` supplies the placeholder returned while a command is only
/// queued in batch mode.
pub trait FromReply: Sized + Default {
    fn from_reply(reply: Reply) -> Result<Self>;
}

impl FromReply for Reply {
    fn from_reply(reply: Reply) -> Result<Self> {
        Ok(reply)
    }
}

impl FromReply for () {
    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Void => Ok(()),
            other => Err(other.mismatch("void")),
        }
    }
}

impl FromReply for Bytes {
    fn from_reply(reply: Reply) -> Result<Self> {
        reply.into_bytes()
    }
}

impl FromReply for i64 {
    fn from_reply(reply: Reply) -> Result<Self> {
        reply.into_int()
    }
}

impl FromReply for bool {
    fn from_reply(reply: Reply) -> Result<Self> {
        Ok(reply.into_int()? != 0)
    }
}

impl FromReply for Vec<Bytes> {
    fn from_reply(reply: Reply) -> Result<Self> {
        reply.into_list()
    }
}

impl FromReply for Vec<(Bytes, Bytes)> {
    fn from_reply(reply: Reply) -> Result<Self> {
        reply.into_pairs()
    }
}

impl FromReply for Vec<(Bytes, i64)> {
    fn from_reply(reply: Reply) -> Result<Self> {
        reply.into_scores()
    }
}
