//! Fixed-capacity circular buffer with blocking put/take
//!
//! The protocol uses three primitives:
//! - `empty`: counting semaphore of free slots (starts at capacity)
//! - `filled`: counting semaphore of occupied slots (starts at zero)
//! - `inner`: the exclusive lock over slots, head/tail indices and the
//!   caller-supplied shared state `S`
//!
//! `put` waits on `empty` then takes the lock, `take` waits on `filled` then
//! takes the lock. The lock is never held across a semaphore wait, so the
//! only blocking points that can last are the two semaphore waits, and both
//! are interruptible.

use crate::buffer::error::{BufferError, BufferResult};
use crate::buffer::semaphore::Semaphore;
use crate::core::sync::handle_mutex_poison;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct Inner<T, S> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    len: usize,
    shared: S,
}

/// Bounded FIFO buffer shared by one producer and any number of consumers
///
/// `S` is extra state guarded by the same lock as the slots, so callers can
/// update it in the same critical section as a take (see
/// [`BoundedBuffer::take_with`]).
#[derive(Debug)]
pub struct BoundedBuffer<T, S = ()> {
    capacity: usize,
    empty: Semaphore,
    filled: Semaphore,
    inner: Mutex<Inner<T, S>>,
}

impl<T> BoundedBuffer<T, ()> {
    pub fn new(capacity: NonZeroUsize) -> BufferResult<Self> {
        Self::with_shared(capacity, ())
    }
}

impl<T, S> BoundedBuffer<T, S> {
    /// Allocate all `capacity` slots up front
    ///
    /// Fails with `BufferError::Allocation` instead of aborting when the
    /// storage cannot be reserved.
    pub fn with_shared(capacity: NonZeroUsize, shared: S) -> BufferResult<Self> {
        let capacity = capacity.get();
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| BufferError::Allocation { capacity })?;
        slots.resize_with(capacity, || None);

        Ok(Self {
            capacity,
            empty: Semaphore::new(capacity),
            filled: Semaphore::new(0),
            inner: Mutex::new(Inner {
                slots,
                head: 0,
                tail: 0,
                len: 0,
                shared,
            }),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> BufferResult<MutexGuard<'_, Inner<T, S>>> {
        handle_mutex_poison(self.inner.lock(), |message| BufferError::Poisoned {
            message,
        })
    }

    /// Store `item` at the tail, blocking while the buffer is full
    ///
    /// Returns the slot index written. On `Interrupted` (or a poisoned lock)
    /// nothing is stored and slot accounting is unchanged.
    pub fn put(&self, item: T) -> BufferResult<usize> {
        self.empty.acquire()?;

        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(e) => {
                self.empty.release();
                return Err(e);
            }
        };
        let slot = inner.tail;
        debug_assert!(inner.slots[slot].is_none(), "overwrite of unconsumed slot");
        inner.slots[slot] = Some(item);
        inner.tail = (slot + 1) % self.capacity;
        inner.len += 1;
        drop(inner);

        self.filled.release();
        Ok(slot)
    }

    /// Remove the item at the head, blocking while the buffer is empty
    ///
    /// Returns the slot index read and the item.
    pub fn take(&self) -> BufferResult<(usize, T)> {
        self.take_with(|_, _, _| ())
            .map(|(slot, item, ())| (slot, item))
    }

    /// Like [`take`](Self::take), additionally running `account` inside the
    /// critical section with the slot index, the item and the shared state
    pub fn take_with<R>(
        &self,
        account: impl FnOnce(usize, &T, &mut S) -> R,
    ) -> BufferResult<(usize, T, R)> {
        self.filled.acquire()?;

        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(e) => {
                self.filled.release();
                return Err(e);
            }
        };
        let slot = inner.head;
        let Some(item) = inner.slots[slot].take() else {
            // Unreachable while the semaphore and the ring agree
            drop(inner);
            self.filled.release();
            return Err(BufferError::Poisoned {
                message: format!("filled slot {} was empty", slot),
            });
        };
        inner.head = (slot + 1) % self.capacity;
        inner.len -= 1;
        let outcome = account(slot, &item, &mut inner.shared);
        drop(inner);

        self.empty.release();
        Ok((slot, item, outcome))
    }

    /// Read the shared state under the buffer lock
    pub fn with_shared_state<R>(&self, read: impl FnOnce(&S) -> R) -> BufferResult<R> {
        let inner = self.lock()?;
        Ok(read(&inner.shared))
    }

    /// Cancel one current or future `take` wait
    pub fn interrupt_take(&self) {
        self.filled.interrupt();
    }

    /// Cancel one current or future `put` wait
    pub fn interrupt_put(&self) {
        self.empty.interrupt();
    }

    /// Drop interrupt tokens no waiter consumed, returning how many there were
    pub fn clear_interrupts(&self) -> usize {
        self.empty.clear_interrupts() + self.filled.clear_interrupts()
    }

    /// Number of occupied slots, `(tail - head) mod capacity` or capacity when full
    pub fn len(&self) -> BufferResult<usize> {
        Ok(self.lock()?.len)
    }

    pub fn is_empty(&self) -> BufferResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Current value of the free-slot semaphore
    pub fn free_slots(&self) -> usize {
        self.empty.permits()
    }

    /// Current value of the filled-slot semaphore
    pub fn filled_slots(&self) -> usize {
        self.filled.permits()
    }
}
