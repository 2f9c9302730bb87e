//! Transport
//!
//! The byte stream a connection talks over, and TCP setup helpers.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use crate::config::Config;
use crate::error::Result;

/// A bidirectional byte stream that can be shut down
///
/// Implemented for `TcpStream`; tests plug in scripted in-memory streams.
pub trait Transport: Read + Write {
    /// Release the underlying resource
    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        match TcpStream::shutdown(self, Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn shutdown(&mut self) -> io::Result<()> {
        (**self).shutdown()
    }
}

/// Dial the configured server and apply deadlines
pub fn connect_tcp(config: &Config) -> Result<TcpStream> {
    let stream = match config.connect_timeout() {
        Some(timeout) => TcpStream::connect_timeout(&config.socket_addr()?, timeout)?,
        None => TcpStream::connect((config.host.as_str(), config.port))?,
    };

    stream.set_nodelay(config.nodelay)?;
    stream.set_read_timeout(config.read_timeout())?;
    stream.set_write_timeout(config.write_timeout())?;

    Ok(stream)
}

/// Interrupts a blocked client from another thread
///
/// Cancelling shuts the socket down. A read blocked on it returns at once,
/// and the owning client is left broken; reconnect to continue.
#[derive(Debug)]
pub struct CancelHandle {
    stream: TcpStream,
}

impl CancelHandle {
    pub(crate) fn new(stream: &TcpStream) -> Result<Self> {
        Ok(Self {
            stream: stream.try_clone()?,
        })
    }

    pub fn cancel(&self) -> Result<()> {
        tracing::debug!("Cancelling connection");
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e.into()),
            _ => Ok(()),
        }
    }
}
