//! Command definitions
//!
//! Represents requests sent to the server, along with the shape each
//! command's reply is decoded into.

use bytes::Bytes;

use super::FrameEncoder;

/// How the fields after a reply's status token are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// Success or failure only; trailing fields are ignored
    Void,

    /// Exactly one field
    Scalar,

    /// Exactly one field holding a decimal integer
    Integer,

    /// Every remaining field, in order
    List,

    /// Consecutive key/value pairs (even field count)
    Map,

    /// Consecutive key/score pairs with integer scores
    ScoreMap,
}

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Set,
    SetX,
    Get,
    Del,
    Incr,
    Exists,
    Keys,
    Scan,
    Rscan,
    MultiGet,
    Hset,
    Hget,
    Hdel,
    Hincr,
    Hkeys,
    Hscan,
    Zset,
    Zget,
    Zdel,
    Zincr,
    Zkeys,
    Zscan,
    Zrscan,
}

impl CommandType {
    /// Name sent as the first field of the request
    pub fn name(&self) -> &'static str {
        match self {
            CommandType::Set => "set",
            CommandType::SetX => "setx",
            CommandType::Get => "get",
            CommandType::Del => "del",
            CommandType::Incr => "incr",
            CommandType::Exists => "exists",
            CommandType::Keys => "keys",
            CommandType::Scan => "scan",
            CommandType::Rscan => "rscan",
            CommandType::MultiGet => "multi_get",
            CommandType::Hset => "hset",
            CommandType::Hget => "hget",
            CommandType::Hdel => "hdel",
            CommandType::Hincr => "hincr",
            CommandType::Hkeys => "hkeys",
            CommandType::Hscan => "hscan",
            CommandType::Zset => "zset",
            CommandType::Zget => "zget",
            CommandType::Zdel => "zdel",
            CommandType::Zincr => "zincr",
            CommandType::Zkeys => "zkeys",
            CommandType::Zscan => "zscan",
            CommandType::Zrscan => "zrscan",
        }
    }

    /// Shape of this command's reply
    pub fn shape(&self) -> ReplyShape {
        match self {
            CommandType::Set
            | CommandType::SetX
            | CommandType::Del
            | CommandType::Incr
            | CommandType::Hset
            | CommandType::Hdel
            | CommandType::Hincr
            | CommandType::Zset
            | CommandType::Zdel
            | CommandType::Zincr => ReplyShape::Void,

            CommandType::Get | CommandType::Hget => ReplyShape::Scalar,

            CommandType::Exists | CommandType::Zget => ReplyShape::Integer,

            CommandType::Keys | CommandType::Hkeys | CommandType::Zkeys => ReplyShape::List,

            CommandType::Scan | CommandType::Rscan | CommandType::MultiGet | CommandType::Hscan => {
                ReplyShape::Map
            }

            CommandType::Zscan | CommandType::Zrscan => ReplyShape::ScoreMap,
        }
    }
}

/// A request with its arguments
///
/// Score bounds of the sorted-set range commands are `None` when the range
/// is open on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { key: Vec<u8>, value: Vec<u8> },
    SetX { key: Vec<u8>, value: Vec<u8>, ttl: u64 },
    Get { key: Vec<u8> },
    Del { key: Vec<u8> },
    Incr { key: Vec<u8>, by: i64 },
    Exists { key: Vec<u8> },
    Keys { start: Vec<u8>, end: Vec<u8>, limit: u64 },
    Scan { start: Vec<u8>, end: Vec<u8>, limit: u64 },
    Rscan { start: Vec<u8>, end: Vec<u8>, limit: u64 },
    MultiGet { keys: Vec<Vec<u8>> },

    Hset { name: Vec<u8>, key: Vec<u8>, value: Vec<u8> },
    Hget { name: Vec<u8>, key: Vec<u8> },
    Hdel { name: Vec<u8>, key: Vec<u8> },
    Hincr { name: Vec<u8>, key: Vec<u8>, by: i64 },
    Hkeys { name: Vec<u8>, start: Vec<u8>, end: Vec<u8>, limit: u64 },
    Hscan { name: Vec<u8>, start: Vec<u8>, end: Vec<u8>, limit: u64 },

    Zset { name: Vec<u8>, key: Vec<u8>, score: i64 },
    Zget { name: Vec<u8>, key: Vec<u8> },
    Zdel { name: Vec<u8>, key: Vec<u8> },
    Zincr { name: Vec<u8>, key: Vec<u8>, by: i64 },
    Zkeys(ZRange),
    Zscan(ZRange),
    Zrscan(ZRange),
}

/// Arguments shared by the sorted-set range commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZRange {
    pub name: Vec<u8>,
    pub key_start: Vec<u8>,
    pub score_start: Option<i64>,
    pub score_end: Option<i64>,
    pub limit: u64,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Set { .. } => CommandType::Set,
            Command::SetX { .. } => CommandType::SetX,
            Command::Get { .. } => CommandType::Get,
            Command::Del { .. } => CommandType::Del,
            Command::Incr { .. } => CommandType::Incr,
            Command::Exists { .. } => CommandType::Exists,
            Command::Keys { .. } => CommandType::Keys,
            Command::Scan { .. } => CommandType::Scan,
            Command::Rscan { .. } => CommandType::Rscan,
            Command::MultiGet { .. } => CommandType::MultiGet,
            Command::Hset { .. } => CommandType::Hset,
            Command::Hget { .. } => CommandType::Hget,
            Command::Hdel { .. } => CommandType::Hdel,
            Command::Hincr { .. } => CommandType::Hincr,
            Command::Hkeys { .. } => CommandType::Hkeys,
            Command::Hscan { .. } => CommandType::Hscan,
            Command::Zset { .. } => CommandType::Zset,
            Command::Zget { .. } => CommandType::Zget,
            Command::Zdel { .. } => CommandType::Zdel,
            Command::Zincr { .. } => CommandType::Zincr,
            Command::Zkeys(_) => CommandType::Zkeys,
            Command::Zscan(_) => CommandType::Zscan,
            Command::Zrscan(_) => CommandType::Zrscan,
        }
    }

    /// Encode the command into a request frame
    pub fn encode(&self) -> Bytes {
        let frame = FrameEncoder::new().arg(self.command_type().name());

        let frame = match self {
            Command::Set { key, value } => frame.arg(key).arg(value),
            Command::SetX { key, value, ttl } => frame.arg(key).arg(value).uint(*ttl),
            Command::Get { key } | Command::Del { key } | Command::Exists { key } => frame.arg(key),
            Command::Incr { key, by } => frame.arg(key).int(*by),
            Command::Keys { start, end, limit }
            | Command::Scan { start, end, limit }
            | Command::Rscan { start, end, limit } => frame.arg(start).arg(end).uint(*limit),
            Command::MultiGet { keys } => keys.iter().fold(frame, |frame, key| frame.arg(key)),

            Command::Hset { name, key, value } => frame.arg(name).arg(key).arg(value),
            Command::Hget { name, key } | Command::Hdel { name, key } => frame.arg(name).arg(key),
            Command::Hincr { name, key, by } => frame.arg(name).arg(key).int(*by),
            Command::Hkeys { name, start, end, limit }
            | Command::Hscan { name, start, end, limit } => {
                frame.arg(name).arg(start).arg(end).uint(*limit)
            }

            Command::Zset { name, key, score } => frame.arg(name).arg(key).int(*score),
            Command::Zget { name, key } | Command::Zdel { name, key } => frame.arg(name).arg(key),
            Command::Zincr { name, key, by } => frame.arg(name).arg(key).int(*by),
            Command::Zkeys(range) | Command::Zscan(range) | Command::Zrscan(range) => frame
                .arg(&range.name)
                .arg(&range.key_start)
                .opt_int(range.score_start)
                .opt_int(range.score_end)
                .uint(range.limit),
        };

        frame.finish()
    }
}
