//! Bounded hand-off queue linking two pipeline stages.
//!
//! A FIFO with a capacity limit and blocking `enqueue` / `dequeue`. Each
//! queue owns its own mutex and condition variables, so unrelated runs in
//! the same process never contend on a shared lock.
//!
//! The consumer may [`close`](HandoffQueue::close) the queue when it stops
//! early. A closed queue rejects further items, which lets an upstream stage
//! blocked on a full queue unwind instead of waiting forever, and reads as
//! end-of-stream to any other consumer still attached to it.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::io::chunk::Chunk;

/// Returned by [`HandoffQueue::enqueue`] once the consumer has gone away.
/// Hands the rejected chunk back to the caller.
#[derive(Debug, PartialEq, Eq)]
pub struct QueueClosed(pub Chunk);

impl fmt::Display for QueueClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("hand-off queue closed by its consumer")
    }
}

impl std::error::Error for QueueClosed {}

struct QueueState {
    items: VecDeque<Chunk>,
    closed: bool,
}

/// Thread-safe bounded FIFO of [`Chunk`]s.
pub struct HandoffQueue {
    capacity: usize,
    state: Mutex<QueueState>,
    /// Signalled when an item is removed or the queue is closed.
    not_full: Condvar,
    /// Signalled when an item is appended or the queue is closed.
    not_empty: Condvar,
}

impl HandoffQueue {
    /// Creates an empty queue holding at most `capacity` items (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        HandoffQueue {
            capacity,
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // Every critical section leaves the deque consistent, so the state
        // is still usable after a panic on another thread.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits until the queue holds fewer than `capacity` items, then appends
    /// `chunk` at the tail.
    pub fn enqueue(&self, chunk: Chunk) -> Result<(), QueueClosed> {
        let mut s = self.lock();
        while !s.closed && s.items.len() >= self.capacity {
            s = self
                .not_full
                .wait(s)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if s.closed {
            return Err(QueueClosed(chunk));
        }
        s.items.push_back(chunk);
        drop(s);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Waits until at least one item exists, then removes and returns the head.
    /// A closed queue yields the sentinel.
    pub fn dequeue(&self) -> Chunk {
        let mut s = self.lock();
        loop {
            if let Some(chunk) = s.items.pop_front() {
                drop(s);
                self.not_full.notify_one();
                return chunk;
            }
            if s.closed {
                return Chunk::sentinel();
            }
            s = self
                .not_empty
                .wait(s)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Marks the queue as abandoned by its consumer. Pending items are
    /// dropped and every blocked or future `enqueue` fails.
    pub fn close(&self) {
        let mut s = self.lock();
        s.closed = true;
        s.items.clear();
        drop(s);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl fmt::Debug for HandoffQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.lock();
        f.debug_struct("HandoffQueue")
            .field("capacity", &self.capacity)
            .field("len", &s.items.len())
            .field("closed", &s.closed)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
