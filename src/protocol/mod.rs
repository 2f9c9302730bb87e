//! Protocol Module
//!
//! Defines the SSDB wire protocol spoken between client and server.
//!
//! ## Frame Format
//!
//! Requests and replies share one layout: a sequence of length-prefixed
//! fields closed by a blank line.
//!
//! ```text
//! ┌────────────┬────┬──────────────┬────┐
//! │ len (ASCII)│ \n │  raw bytes   │ \n │   repeated per field
//! └────────────┴────┴──────────────┴────┘
//! ┌────┐
//! │ \n │                                     frame terminator
//! └────┘
//! ```
//!
//! `set test 456` is sent as `3\nset\n4\ntest\n3\n456\n\n`.
//!
//! ### Replies
//! - field[0] is the status token, compared case-insensitively to `ok`
//! - other tokens (`not_found`, `error`, `fail`, `client_error`) carry an
//!   optional message in field[1]
//! - the remaining fields are interpreted by the command's [`ReplyShape`]
//!
//! Replies carry no request identifier; they arrive strictly in request
//! order.

mod codec;
mod buffer;
mod command;
mod response;

pub use codec::{decode_frame, encode_frame, FrameEncoder};
pub use buffer::FrameBuffer;
pub use command::{Command, CommandType, ReplyShape, ZRange};
pub use response::{decode_reply, FromReply, Reply, STATUS_OK};

pub(crate) use codec::{next_token, Token};
