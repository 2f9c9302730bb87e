//! Scripted in-memory transport
//!
//! Replays a fixed sequence of reads (in chosen chunk sizes, with optional
//! injected failures) and records everything written.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use ssdb_client::{Client, Config, Transport};

enum Step {
    Data(Vec<u8>),
    Fail(io::ErrorKind),
}

/// Observes a `ScriptedStream` after it has been moved into a client
#[derive(Clone, Default)]
pub struct Recorder {
    written: Arc<Mutex<Vec<u8>>>,
    reads: Arc<AtomicUsize>,
    shutdown: Arc<AtomicBool>,
}

impl Recorder {
    pub fn written(&self) -> Vec<u8> {
        self.written.lock().clone()
    }

    /// Number of read calls that reached the stream
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn was_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

pub struct ScriptedStream {
    steps: VecDeque<Step>,
    fail_writes: Option<io::ErrorKind>,
    recorder: Recorder,
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            fail_writes: None,
            recorder: Recorder::default(),
        }
    }

    /// Deliver `data` in a single read
    pub fn reply(mut self, data: &[u8]) -> Self {
        self.steps.push_back(Step::Data(data.to_vec()));
        self
    }

    /// Deliver `data` in reads of at most `chunk` bytes
    pub fn chunked(mut self, data: &[u8], chunk: usize) -> Self {
        for piece in data.chunks(chunk) {
            self.steps.push_back(Step::Data(piece.to_vec()));
        }
        self
    }

    /// Make the next read fail
    pub fn fail(mut self, kind: io::ErrorKind) -> Self {
        self.steps.push_back(Step::Fail(kind));
        self
    }

    /// Make every write fail
    pub fn fail_writes(mut self, kind: io::ErrorKind) -> Self {
        self.fail_writes = Some(kind);
        self
    }

    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }

    /// Wrap the stream in a client with default config
    pub fn into_client(self) -> (Client<ScriptedStream>, Recorder) {
        self.into_client_with(&Config::default())
    }

    pub fn into_client_with(self, config: &Config) -> (Client<ScriptedStream>, Recorder) {
        let recorder = self.recorder();
        (Client::from_stream(self, config), recorder)
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.recorder.reads.fetch_add(1, Ordering::SeqCst);

        match self.steps.pop_front() {
            // Script exhausted: end of stream
            None => Ok(0),
            Some(Step::Fail(kind)) => Err(io::Error::new(kind, "scripted failure")),
            Some(Step::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    self.steps.push_front(Step::Data(data.split_off(n)));
                }
                Ok(n)
            }
        }
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(kind) = self.fail_writes {
            return Err(io::Error::new(kind, "scripted write failure"));
        }
        self.recorder.written.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for ScriptedStream {
    fn shutdown(&mut self) -> io::Result<()> {
        self.recorder.shutdown.store(true, Ordering::SeqCst);
        Ok(())
    }
}
