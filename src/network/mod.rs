//! Network Module
//!
//! Transport ownership and request/reply plumbing.
//!
//! ## Architecture
//! - `Connection` owns the stream and the receive accumulator
//! - `Pipeline` queues encoded requests for one flush-and-collect cycle
//! - Everything is blocking and single-owner; replies are matched to
//!   requests purely by order

mod transport;
mod connection;
mod pipeline;

pub use transport::{connect_tcp, CancelHandle, Transport};
pub use connection::{Connection, ConnectionState};
pub use pipeline::{Pipeline, QueuedCommand};
