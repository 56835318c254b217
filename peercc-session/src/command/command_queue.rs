use crate::command::Command;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::Notify;

/// Returned by [`CommandQueue::enqueue`] once the queue has been closed.
/// Hands the rejected command back to the producer.
#[derive(Debug, Error)]
#[error("command queue is closed")]
pub struct QueueClosed(pub Command);

#[derive(Default)]
struct Pending {
    commands: Vec<Command>,
    closed: bool,
}

/// Multi-producer, single-consumer mailbox.
///
/// Producers append under a short mutex. The consumer detaches the whole
/// backlog at once, so anything enqueued while a batch is being applied
/// lands in the next batch.
#[derive(Default)]
pub struct CommandQueue {
    pending: Mutex<Pending>,
    ready: Notify,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, command: Command) -> Result<(), QueueClosed> {
        {
            let mut pending = self.pending();
            if pending.closed {
                return Err(QueueClosed(command));
            }
            pending.commands.push(command);
        }
        self.ready.notify_one();
        Ok(())
    }

    /// Detach every queued command in FIFO order, leaving the queue empty.
    pub fn drain_all(&self) -> Vec<Command> {
        mem::take(&mut self.pending().commands)
    }

    /// Wait until at least one command is queued and drain it.
    ///
    /// Returns `None` once the queue is closed and nothing is left.
    pub async fn next_batch(&self) -> Option<Vec<Command>> {
        loop {
            {
                let mut pending = self.pending();
                if !pending.commands.is_empty() {
                    return Some(mem::take(&mut pending.commands));
                }
                if pending.closed {
                    return None;
                }
            }
            self.ready.notified().await;
        }
    }

    /// Refuse further commands. Already queued commands are still delivered.
    pub fn close(&self) {
        self.pending().closed = true;
        self.ready.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.pending().closed
    }

    pub fn len(&self) -> usize {
        self.pending().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
