//! Connection
//!
//! Owns the transport and the receive accumulator. Every read and write
//! goes through here, so this is where transport failures turn a
//! connection unusable.

use std::io;

use bytes::{Bytes, BytesMut};

use super::Transport;
use crate::config::Config;
use crate::error::{Result, SsdbError};
use crate::protocol::FrameBuffer;

/// Lifecycle of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Usable
    Open,

    /// A transport failure left the stream mid-frame; reconnect to continue
    Broken,

    /// Closed by the caller
    Closed,
}

/// One persistent stream to the server
pub struct Connection<T: Transport> {
    /// Underlying stream (`None` once closed)
    stream: Option<T>,

    /// Received bytes not yet handed out as frames
    buffer: FrameBuffer,

    state: ConnectionState,

    /// Bytes requested per transport read
    read_chunk_size: usize,

    /// Peer label for logging
    peer: String,
}

impl<T: Transport> Connection<T> {
    /// Wrap an established stream
    pub fn new(stream: T, config: &Config, peer: impl Into<String>) -> Self {
        Self {
            stream: Some(stream),
            buffer: FrameBuffer::with_max_frame_size(config.max_frame_size),
            state: ConnectionState::Open,
            read_chunk_size: config.read_chunk_size.max(1),
            peer: peer.into(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub(crate) fn stream(&self) -> Option<&T> {
        self.stream.as_ref()
    }

    /// Fail fast unless the connection is open
    pub fn ensure_open(&self) -> Result<()> {
        match self.state {
            ConnectionState::Open => Ok(()),
            ConnectionState::Broken => Err(SsdbError::ConnectionBroken),
            ConnectionState::Closed => Err(SsdbError::ConnectionClosed),
        }
    }

    /// Write request frames in order and flush
    pub fn send(&mut self, frames: &[Bytes]) -> Result<()> {
        self.ensure_open()?;

        let result = match frames {
            [frame] => self.write_all(frame),
            _ => {
                let total = frames.iter().map(Bytes::len).sum();
                let mut batch = BytesMut::with_capacity(total);
                for frame in frames {
                    batch.extend_from_slice(frame);
                }
                self.write_all(&batch)
            }
        };

        result.map_err(|e| self.poison(e.into()))
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let stream = self.stream.as_mut().ok_or(io::ErrorKind::NotConnected)?;
        stream.write_all(data)?;
        stream.flush()
    }

    /// Block until one complete reply frame is available
    pub fn read_frame(&mut self) -> Result<Bytes> {
        self.ensure_open()?;

        loop {
            match self.buffer.extract_frame() {
                Ok(Some(frame)) => {
                    tracing::trace!("Received {} byte frame from {}", frame.len(), self.peer);
                    return Ok(frame);
                }
                Ok(None) => {}
                // Oversized frame; the stream cannot be realigned
                Err(e) => return Err(self.poison(e)),
            }

            let stream = match self.stream.as_mut() {
                Some(stream) => stream,
                None => return Err(SsdbError::ConnectionClosed),
            };

            match self.buffer.fill_from(stream, self.read_chunk_size) {
                Ok(0) => {
                    let eof = io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed by server",
                    );
                    return Err(self.poison(eof.into()));
                }
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.poison(e.into())),
            }
        }
    }

    /// Send one frame and wait for its reply
    pub fn round_trip(&mut self, frame: Bytes) -> Result<Bytes> {
        self.send(std::slice::from_ref(&frame))?;
        self.read_frame()
    }

    /// Mark the connection unusable after a transport failure
    fn poison(&mut self, error: SsdbError) -> SsdbError {
        match &error {
            SsdbError::Io(e)
                if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
            {
                tracing::warn!("Deadline expired on {}: {}", self.peer, e);
            }
            _ => tracing::warn!("Connection to {} unusable: {}", self.peer, error),
        }

        self.state = ConnectionState::Broken;
        self.buffer.clear();
        error
    }

    /// Release the transport
    ///
    /// Idempotent. Buffered bytes are discarded.
    pub fn close(&mut self) -> Result<()> {
        self.buffer.clear();
        self.state = ConnectionState::Closed;

        match self.stream.take() {
            Some(mut stream) => {
                tracing::debug!("Closing connection to {}", self.peer);
                stream.shutdown()?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown();
        }
    }
}
