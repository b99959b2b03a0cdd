//! Synchronization utilities for robust mutex handling
//!
//! Mutex poisoning is either converted into a typed error (for locks that
//! guard user-visible state such as the ring buffer) or recovered from (for
//! bookkeeping locks whose invariants cannot be broken by a panic).

use std::sync::{Condvar, LockResult, Mutex, MutexGuard};

/// Handle poisoned mutex cases with consistent error handling
///
/// Converts a mutex poison error into an application-specific error using the
/// provided constructor, so a panic in one worker surfaces as an error in the
/// others instead of a cascade of panics.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use proctally::core::sync::handle_mutex_poison;
/// use proctally::buffer::BufferError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| BufferError::Poisoned { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

/// Lock a mutex, recovering the inner value if a previous holder panicked.
///
/// Only for state that stays consistent across a panic (plain counters
/// updated in a single statement).
pub fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poison) => poison.into_inner(),
    }
}

/// Wait on a condition variable, recovering the guard on poison.
pub fn wait_or_recover<'a, T>(condvar: &Condvar, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
    match condvar.wait(guard) {
        Ok(guard) => guard,
        Err(poison) => poison.into_inner(),
    }
}
