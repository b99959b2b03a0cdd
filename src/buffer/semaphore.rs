//! Counting semaphore with cooperative interruption
//!
//! `acquire` blocks until a permit is available or until an interrupt token
//! has been posted with [`Semaphore::interrupt`]. Each interrupt token
//! cancels exactly one wait (current or future) and is consumed by it, so
//! posting one token per potential waiter guarantees every waiter wakes.
//! A cancelled wait takes no permit.

use crate::buffer::error::{BufferError, BufferResult};
use crate::core::sync::{lock_or_recover, wait_or_recover};
use std::sync::{Condvar, Mutex};

#[derive(Debug)]
struct State {
    permits: usize,
    interrupts: usize,
}

/// Blocking counting semaphore
#[derive(Debug)]
pub struct Semaphore {
    state: Mutex<State>,
    cv: Condvar,
}

impl Semaphore {
    pub fn new(permits: usize) -> Self {
        Self {
            state: Mutex::new(State {
                permits,
                interrupts: 0,
            }),
            cv: Condvar::new(),
        }
    }

    /// Take one permit, blocking while none is available
    ///
    /// Returns `BufferError::Interrupted` if an interrupt token is pending or
    /// arrives while waiting. Pending interrupts win over available permits.
    pub fn acquire(&self) -> BufferResult<()> {
        let mut state = lock_or_recover(&self.state);
        loop {
            if state.interrupts > 0 {
                state.interrupts -= 1;
                return Err(BufferError::Interrupted);
            }
            if state.permits > 0 {
                state.permits -= 1;
                return Ok(());
            }
            state = wait_or_recover(&self.cv, state);
        }
    }

    /// Return one permit and wake one waiter
    pub fn release(&self) {
        let mut state = lock_or_recover(&self.state);
        state.permits += 1;
        drop(state);
        self.cv.notify_one();
    }

    /// Post one interrupt token and wake one waiter
    pub fn interrupt(&self) {
        let mut state = lock_or_recover(&self.state);
        state.interrupts += 1;
        drop(state);
        self.cv.notify_one();
    }

    /// Discard interrupt tokens nobody consumed
    pub fn clear_interrupts(&self) -> usize {
        let mut state = lock_or_recover(&self.state);
        std::mem::take(&mut state.interrupts)
    }

    /// Snapshot of the current permit count
    pub fn permits(&self) -> usize {
        lock_or_recover(&self.state).permits
    }
}
