//! Client
//!
//! Caller-facing façade: one method per supported command, each built on
//! the same encode → send-or-enqueue → decode-by-shape path.
//!
//! ## Modes
//! - **Direct** (default): every call sends its request and blocks for
//!   exactly one reply.
//! - **Batch**: after [`Client::batch`], calls only encode and queue their
//!   request and return the result type's default value. [`Client::exec`]
//!   flushes the queue, collects one reply per request in order, and
//!   switches back to direct mode.
//!
//! ```no_run
//! use ssdb_client::{Client, Config};
//!
//! let mut client = Client::connect(&Config::default())?;
//! client.set("test", "456")?;
//! assert_eq!(&client.get("test")?[..], b"456");
//!
//! client.batch();
//! client.set("a", "1")?;
//! client.incr("a", 100)?;
//! client.get("a")?;
//! let replies = client.exec()?;
//! assert_eq!(replies.len(), 3);
//! # Ok::<(), ssdb_client::SsdbError>(())
//! ```

use std::net::TcpStream;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::{Result, SsdbError};
use crate::network::{connect_tcp, CancelHandle, Connection, ConnectionState, Pipeline, Transport};
use crate::protocol::{decode_frame, decode_reply, Command, FromReply, Reply, ZRange};

/// A single-owner connection to the server
pub struct Client<T: Transport = TcpStream> {
    conn: Connection<T>,
    pipeline: Pipeline,
    batch_mode: bool,
}

impl Client<TcpStream> {
    /// Dial the configured server
    pub fn connect(config: &Config) -> Result<Self> {
        let stream = connect_tcp(config)?;
        tracing::debug!("Connected to {}", config.address());
        Ok(Self::from_stream(stream, config))
    }

    /// Handle that can interrupt this client from another thread
    pub fn cancel_handle(&self) -> Result<CancelHandle> {
        self.conn.ensure_open()?;
        match self.conn.stream() {
            Some(stream) => CancelHandle::new(stream),
            None => Err(SsdbError::ConnectionClosed),
        }
    }
}

impl<T: Transport> Client<T> {
    /// Wrap an already established stream
    pub fn from_stream(stream: T, config: &Config) -> Self {
        Self {
            conn: Connection::new(stream, config, config.address()),
            pipeline: Pipeline::new(),
            batch_mode: false,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn state(&self) -> ConnectionState {
        self.conn.state()
    }

    /// Release the transport; later calls fail with `ConnectionClosed`
    ///
    /// Queued batch commands are discarded.
    pub fn close(&mut self) -> Result<()> {
        self.batch_mode = false;
        self.pipeline.clear();
        self.conn.close()
    }

    // =========================================================================
    // Batch Mode
    // =========================================================================

    /// Queue subsequent commands instead of sending them
    pub fn batch(&mut self) {
        self.batch_mode = true;
    }

    pub fn is_batch(&self) -> bool {
        self.batch_mode
    }

    /// Number of queued commands
    pub fn pending(&self) -> usize {
        self.pipeline.len()
    }

    /// Flush queued commands and collect their replies in queue order
    ///
    /// Per-command failures are reported in their own slot. A transport
    /// failure returns `SsdbError::BatchAborted` carrying the replies read
    /// so far. Batch mode is left in every case.
    pub fn exec(&mut self) -> Result<Vec<Result<Reply>>> {
        let was_batch = std::mem::replace(&mut self.batch_mode, false);

        if let Err(e) = self.conn.ensure_open() {
            self.pipeline.clear();
            return Err(e);
        }
        if !was_batch {
            return Ok(Vec::new());
        }

        self.pipeline.execute(&mut self.conn)
    }

    // =========================================================================
    // Generic Dispatch
    // =========================================================================

    /// Run any command and return its reply
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        self.call(command)
    }

    /// Encode `command`, then send it or queue it, and decode by its shape
    pub fn call<R: FromReply>(&mut self, command: Command) -> Result<R> {
        self.conn.ensure_open()?;

        let command_type = command.command_type();
        let frame = command.encode();

        if self.batch_mode {
            self.pipeline.enqueue(command_type, frame);
            return Ok(R::default());
        }

        let reply = self.conn.round_trip(frame)?;
        let reply = decode_reply(command_type.shape(), decode_frame(reply)?)?;
        R::from_reply(reply)
    }

    // =========================================================================
    // Key/Value Commands
    // =========================================================================

    pub fn set(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        self.call(Command::Set {
            key: bytes(key),
            value: bytes(value),
        })
    }

    /// Set with a time-to-live in seconds
    pub fn setx(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>, ttl: u64) -> Result<()> {
        self.call(Command::SetX {
            key: bytes(key),
            value: bytes(value),
            ttl,
        })
    }

    /// A missing key is a `Server` error with `is_not_found() == true`
    pub fn get(&mut self, key: impl AsRef<[u8]>) -> Result<Bytes> {
        self.call(Command::Get { key: bytes(key) })
    }

    pub fn del(&mut self, key: impl AsRef<[u8]>) -> Result<()> {
        self.call(Command::Del { key: bytes(key) })
    }

    pub fn incr(&mut self, key: impl AsRef<[u8]>, by: i64) -> Result<()> {
        self.call(Command::Incr { key: bytes(key), by })
    }

    pub fn exists(&mut self, key: impl AsRef<[u8]>) -> Result<bool> {
        self.call(Command::Exists { key: bytes(key) })
    }

    /// Keys in `(start, end]`; empty bounds are open
    pub fn keys(
        &mut self,
        start: impl AsRef<[u8]>,
        end: impl AsRef<[u8]>,
        limit: u64,
    ) -> Result<Vec<Bytes>> {
        self.call(Command::Keys {
            start: bytes(start),
            end: bytes(end),
            limit,
        })
    }

    pub fn scan(
        &mut self,
        start: impl AsRef<[u8]>,
        end: impl AsRef<[u8]>,
        limit: u64,
    ) -> Result<Vec<(Bytes, Bytes)>> {
        self.call(Command::Scan {
            start: bytes(start),
            end: bytes(end),
            limit,
        })
    }

    pub fn rscan(
        &mut self,
        start: impl AsRef<[u8]>,
        end: impl AsRef<[u8]>,
        limit: u64,
    ) -> Result<Vec<(Bytes, Bytes)>> {
        self.call(Command::Rscan {
            start: bytes(start),
            end: bytes(end),
            limit,
        })
    }

    /// Values of the given keys that exist, as key/value pairs
    pub fn multi_get<I, K>(&mut self, keys: I) -> Result<Vec<(Bytes, Bytes)>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        self.call(Command::MultiGet {
            keys: keys.into_iter().map(|key| key.as_ref().to_vec()).collect(),
        })
    }

    // =========================================================================
    // Hash Commands
    // =========================================================================

    pub fn hset(
        &mut self,
        name: impl AsRef<[u8]>,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<()> {
        self.call(Command::Hset {
            name: bytes(name),
            key: bytes(key),
            value: bytes(value),
        })
    }

    pub fn hget(&mut self, name: impl AsRef<[u8]>, key: impl AsRef<[u8]>) -> Result<Bytes> {
        self.call(Command::Hget {
            name: bytes(name),
            key: bytes(key),
        })
    }

    pub fn hdel(&mut self, name: impl AsRef<[u8]>, key: impl AsRef<[u8]>) -> Result<()> {
        self.call(Command::Hdel {
            name: bytes(name),
            key: bytes(key),
        })
    }

    pub fn hincr(&mut self, name: impl AsRef<[u8]>, key: impl AsRef<[u8]>, by: i64) -> Result<()> {
        self.call(Command::Hincr {
            name: bytes(name),
            key: bytes(key),
            by,
        })
    }

    pub fn hkeys(
        &mut self,
        name: impl AsRef<[u8]>,
        start: impl AsRef<[u8]>,
        end: impl AsRef<[u8]>,
        limit: u64,
    ) -> Result<Vec<Bytes>> {
        self.call(Command::Hkeys {
            name: bytes(name),
            start: bytes(start),
            end: bytes(end),
            limit,
        })
    }

    pub fn hscan(
        &mut self,
        name: impl AsRef<[u8]>,
        start: impl AsRef<[u8]>,
        end: impl AsRef<[u8]>,
        limit: u64,
    ) -> Result<Vec<(Bytes, Bytes)>> {
        self.call(Command::Hscan {
            name: bytes(name),
            start: bytes(start),
            end: bytes(end),
            limit,
        })
    }

    // =========================================================================
    // Sorted Set Commands
    // =========================================================================

    pub fn zset(
        &mut self,
        name: impl AsRef<[u8]>,
        key: impl AsRef<[u8]>,
        score: i64,
    ) -> Result<()> {
        self.call(Command::Zset {
            name: bytes(name),
            key: bytes(key),
            score,
        })
    }

    pub fn zget(&mut self, name: impl AsRef<[u8]>, key: impl AsRef<[u8]>) -> Result<i64> {
        self.call(Command::Zget {
            name: bytes(name),
            key: bytes(key),
        })
    }

    pub fn zdel(&mut self, name: impl AsRef<[u8]>, key: impl AsRef<[u8]>) -> Result<()> {
        self.call(Command::Zdel {
            name: bytes(name),
            key: bytes(key),
        })
    }

    pub fn zincr(&mut self, name: impl AsRef<[u8]>, key: impl AsRef<[u8]>, by: i64) -> Result<()> {
        self.call(Command::Zincr {
            name: bytes(name),
            key: bytes(key),
            by,
        })
    }

    pub fn zkeys(
        &mut self,
        name: impl AsRef<[u8]>,
        key_start: impl AsRef<[u8]>,
        score_start: Option<i64>,
        score_end: Option<i64>,
        limit: u64,
    ) -> Result<Vec<Bytes>> {
        self.call(Command::Zkeys(z_range(name, key_start, score_start, score_end, limit)))
    }

    /// Members by ascending score, as member/score pairs
    pub fn zscan(
        &mut self,
        name: impl AsRef<[u8]>,
        key_start: impl AsRef<[u8]>,
        score_start: Option<i64>,
        score_end: Option<i64>,
        limit: u64,
    ) -> Result<Vec<(Bytes, i64)>> {
        self.call(Command::Zscan(z_range(name, key_start, score_start, score_end, limit)))
    }

    /// Members by descending score, as member/score pairs
    pub fn zrscan(
        &mut self,
        name: impl AsRef<[u8]>,
        key_start: impl AsRef<[u8]>,
        score_start: Option<i64>,
        score_end: Option<i64>,
        limit: u64,
    ) -> Result<Vec<(Bytes, i64)>> {
        self.call(Command::Zrscan(z_range(name, key_start, score_start, score_end, limit)))
    }
}

fn bytes(value: impl AsRef<[u8]>) -> Vec<u8> {
    value.as_ref().to_vec()
}

fn z_range(
    name: impl AsRef<[u8]>,
    key_start: impl AsRef<[u8]>,
    score_start: Option<i64>,
    score_end: Option<i64>,
    limit: u64,
) -> ZRange {
    ZRange {
        name: bytes(name),
        key_start: bytes(key_start),
        score_start,
        score_end,
        limit,
    }
}

// =============================================================================
// Shared Client
// =============================================================================

/// A client shared between threads
///
/// The lock is held for a whole request/reply cycle, which keeps replies
/// matched to their requests. Use [`SharedClient::with`] to run a batch
/// without other callers interleaving.
pub struct SharedClient<T: Transport = TcpStream> {
    inner: Arc<Mutex<Client<T>>>,
}

impl<T: Transport> SharedClient<T> {
    pub fn new(client: Client<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Exclusive access until the guard drops
    pub fn lock(&self) -> MutexGuard<'_, Client<T>> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access to the client
    pub fn with<R>(&self, f: impl FnOnce(&mut Client<T>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl<T: Transport> Clone for SharedClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
