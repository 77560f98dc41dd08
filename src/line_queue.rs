//! Blocking FIFO of committed input lines.
//!
//! [`LineQueue`] bridges the surface's key listener (the single producer) and
//! any number of threads blocked in [`LineQueue::read_line`]. The queue and its
//! closed flag live under one `parking_lot::Mutex`, paired with a `Condvar`, so
//! a push can never slip in between a reader's emptiness check and its wait.
//!
//! # Delivery
//!
//! - Lines come out in the order they were pushed.
//! - Each line is handed to exactly one reader, whichever wakes first.
//! - A reader only returns once a line exists, the deadline passes, or the
//!   queue is closed.
//!
//! # Cancellation
//!
//! [`close`](LineQueue::close) wakes every blocked reader with
//! [`ConsoleError::Cancelled`]. Lines still queued at that point remain
//! readable; pushes after closing are dropped.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use console_pane::LineQueue;
//!
//! let queue = Arc::new(LineQueue::new());
//! let reader = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || queue.read_line())
//! };
//!
//! queue.push("world".to_string());
//! assert_eq!(reader.join().unwrap().unwrap(), "world");
//! ```

use crate::error::{ConsoleError, Result};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Default)]
struct QueueState {
    lines: VecDeque<String>,
    closed: bool,
}

/// Unbounded, condition-variable guarded line queue.
#[derive(Default)]
pub struct LineQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl LineQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line and wakes one waiting reader.
    ///
    /// Never blocks. Returns `false` if the queue was closed and the line dropped.
    pub fn push(&self, line: String) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            log::debug!("dropping line pushed after close");
            return false;
        }
        state.lines.push_back(line);
        drop(state);
        self.ready.notify_one();
        true
    }

    /// Blocks until a line is available and removes it.
    pub fn read_line(&self) -> Result<String> {
        let mut state = self.state.lock();
        loop {
            if let Some(line) = state.lines.pop_front() {
                return Ok(line);
            }
            if state.closed {
                return Err(ConsoleError::Cancelled);
            }
            self.ready.wait(&mut state);
        }
    }

    /// Like [`read_line`](Self::read_line) but gives up after `timeout`.
    pub fn read_line_timeout(&self, timeout: Duration) -> Result<String> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.read_line();
        };
        let mut state = self.state.lock();
        loop {
            if let Some(line) = state.lines.pop_front() {
                return Ok(line);
            }
            if state.closed {
                return Err(ConsoleError::Cancelled);
            }
            if self.ready.wait_until(&mut state, deadline).timed_out() {
                // A push may have landed together with the timeout
                return state.lines.pop_front().ok_or(ConsoleError::Timeout);
            }
        }
    }

    /// Removes the oldest line without blocking.
    pub fn try_read_line(&self) -> Option<String> {
        self.state.lock().lines.pop_front()
    }

    /// Closes the queue and wakes every blocked reader.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for LineQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LineQueue")
            .field("pending", &state.lines.len())
            .field("closed", &state.closed)
            .finish()
    }
}
