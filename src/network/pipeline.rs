//! Pipeline
//!
//! Queue of encoded requests awaiting one flush-and-collect cycle.
//!
//! Replies carry no identifier, so the n-th frame read after a flush
//! belongs to the n-th queued command. Every queued command gets exactly
//! one reply slot: a server-side failure on one command is recorded in
//! its slot and collection carries on. Only a transport failure stops the
//! cycle, and it is returned together with the slots already filled.

use bytes::Bytes;

use super::{Connection, Transport};
use crate::error::{Result, SsdbError};
use crate::protocol::{decode_frame, decode_reply, CommandType, Reply};

/// A command that has been encoded but not yet sent
#[derive(Debug, Clone)]
pub struct QueuedCommand {
    pub command: CommandType,
    pub frame: Bytes,
}

/// Ordered queue of pending commands
#[derive(Debug, Default)]
pub struct Pipeline {
    queue: Vec<QueuedCommand>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail of the queue
    pub fn enqueue(&mut self, command: CommandType, frame: Bytes) {
        self.queue.push(QueuedCommand { command, frame });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every queued command without sending it
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Flush the queue and collect one reply per command, in order
    ///
    /// The queue is empty afterwards whatever the outcome.
    pub fn execute<T: Transport>(
        &mut self,
        conn: &mut Connection<T>,
    ) -> Result<Vec<Result<Reply>>> {
        let queue = std::mem::take(&mut self.queue);
        if queue.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Flushing {} pipelined commands to {}", queue.len(), conn.peer());

        let frames: Vec<Bytes> = queue.iter().map(|queued| queued.frame.clone()).collect();
        if let Err(e) = conn.send(&frames) {
            return Err(aborted(Vec::new(), e));
        }

        let mut results = Vec::with_capacity(queue.len());
        for queued in &queue {
            let frame = match conn.read_frame() {
                Ok(frame) => frame,
                Err(e) => return Err(aborted(results, e)),
            };

            let reply = decode_frame(frame)
                .and_then(|fields| decode_reply(queued.command.shape(), fields));
            if let Err(e) = &reply {
                tracing::debug!("Pipelined {} failed: {}", queued.command.name(), e);
            }
            results.push(reply);
        }

        Ok(results)
    }
}

fn aborted(completed: Vec<Result<Reply>>, source: SsdbError) -> SsdbError {
    SsdbError::BatchAborted {
        completed,
        source: Box::new(source),
    }
}
