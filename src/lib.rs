//! # ssdb-client
//!
//! A blocking client for the SSDB key-value protocol with:
//! - Binary-safe, length-prefixed frame codec
//! - Incremental frame reassembly across arbitrary read boundaries
//! - Pipelined batches with strictly ordered reply matching
//! - Typed replies selected by each command's reply shape
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Client                              │
//! │          (one method per command, direct or batch)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command::encode
//!          ┌────────────┴────────────┐
//!          │ direct                  │ batch
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ round trip  │          │  Pipeline   │
//!   │             │          │ (FIFO queue)│
//!   └──────┬──────┘          └──────┬──────┘
//!          └────────────┬───────────┘
//!                       ▼
//!               ┌───────────────┐      ┌──────────────┐
//!               │  Connection   │─────▶│ FrameBuffer  │
//!               │  (transport)  │      │ (reassembly) │
//!               └───────────────┘      └──────┬───────┘
//!                                             ▼
//!                                  decode_frame → decode_reply
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SsdbError};
pub use config::Config;
pub use client::{Client, SharedClient};
pub use network::{CancelHandle, ConnectionState, Transport};
pub use protocol::{Command, Reply};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ssdb-client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
