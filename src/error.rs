//! Error types for the SSDB client
//!
//! Provides a unified error type for all operations.
//!
//! Errors fall into four families:
//! - **Transport** (`Io`, `ConnectionClosed`, `ConnectionBroken`,
//!   `BatchAborted`): the connection can no longer be trusted to be
//!   frame-aligned and refuses further work.
//! - **Protocol**: a reply frame is malformed.
//! - **Server**: the server answered with a non-`ok` status.
//! - **Decode**: a well-formed reply does not fit its command's shape.

use thiserror::Error;

use crate::protocol::Reply;

/// Result type alias using SsdbError
pub type Result<T> = std::result::Result<T, SsdbError>;

/// Status token the server uses for a missing key
pub const STATUS_NOT_FOUND: &str = "not_found";

/// Unified error type for SSDB client operations
#[derive(Debug, Error)]
pub enum SsdbError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Connection broken by an earlier transport failure")]
    ConnectionBroken,

    #[error("Batch aborted after {} replies: {source}", .completed.len())]
    BatchAborted {
        /// Results collected before the transport failed, in queue order
        completed: Vec<Result<Reply>>,
        source: Box<SsdbError>,
    },

    // -------------------------------------------------------------------------
    // Reply Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server error: {}", describe_server(.status, .message))]
    Server {
        status: String,
        message: Option<String>,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_server(status: &str, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("{} ({})", status, message),
        None => status.to_string(),
    }
}

impl SsdbError {
    /// True if the error is fatal to the connection it came from
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SsdbError::Io(_)
                | SsdbError::ConnectionClosed
                | SsdbError::ConnectionBroken
                | SsdbError::BatchAborted { .. }
        )
    }

    /// True if the server reported the requested key as missing
    pub fn is_not_found(&self) -> bool {
        match self {
            SsdbError::Server { status, .. } => status.eq_ignore_ascii_case(STATUS_NOT_FOUND),
            _ => false,
        }
    }
}
