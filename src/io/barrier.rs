//! Ordering barrier shared by the transform workers of one run.
//!
//! Holds the "next expected" sequence number. A worker that has finished a
//! chunk waits for its turn before emitting it downstream, then advances the
//! counter. With a single worker reading a FIFO queue the wait never blocks.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct Turn {
    next: u64,
    aborted: bool,
}

/// Returned by [`SequenceBarrier::wait_turn`] after [`SequenceBarrier::abort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierAborted;

#[derive(Debug)]
pub struct SequenceBarrier {
    turn: Mutex<Turn>,
    cvar: Condvar,
}

impl Default for SequenceBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceBarrier {
    /// Creates a barrier expecting sequence number 0 first.
    pub fn new() -> Self {
        SequenceBarrier {
            turn: Mutex::new(Turn {
                next: 0,
                aborted: false,
            }),
            cvar: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Turn> {
        self.turn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until `seq` is the next expected number, or the barrier is aborted.
    pub fn wait_turn(&self, seq: u64) -> Result<(), BarrierAborted> {
        let mut t = self.lock();
        while !t.aborted && t.next != seq {
            t = self.cvar.wait(t).unwrap_or_else(PoisonError::into_inner);
        }
        if t.aborted {
            Err(BarrierAborted)
        } else {
            Ok(())
        }
    }

    /// Marks the current turn as done and wakes every waiter.
    pub fn advance(&self) {
        let mut t = self.lock();
        t.next += 1;
        drop(t);
        self.cvar.notify_all();
    }

    /// Releases every waiter with [`BarrierAborted`]. Used when a worker
    /// fails and the chunk another worker is waiting behind will never come.
    pub fn abort(&self) {
        let mut t = self.lock();
        t.aborted = true;
        drop(t);
        self.cvar.notify_all();
    }

    pub fn next_expected(&self) -> u64 {
        self.lock().next
    }

    pub fn is_aborted(&self) -> bool {
        self.lock().aborted
    }
}
