//! Bounded Buffer Component
//!
//! A fixed-capacity circular buffer shared by one producer and N consumers,
//! synchronised with the classic three-primitive protocol.
//!
//! # Architecture
//!
//! ```text
//!   Producer                                     Consumer 1..N
//!      │ put                                          ▲ take
//!      ▼                                              │
//!  empty.acquire ──► lock ──► slots[tail] ──► filled.release
//!                                                     │
//!  filled.acquire ──► lock ──► slots[head] ──► empty.release
//!
//!   ┌───┬───┬───┬───┬───┐
//!   │ 3 │ 4 │   │   │ 2 │   head = 4, tail = 2, len = 3
//!   └───┴───┴───┴───┴───┘
//! ```
//!
//! Both semaphore waits can be interrupted, which is what lets the pipeline
//! shut down without leaving a thread parked forever.
//!
//! # Example Usage
//!
//! ```rust
//! use proctally::buffer::BoundedBuffer;
//! use std::num::NonZeroUsize;
//!
//! let buffer = BoundedBuffer::new(NonZeroUsize::new(2).unwrap()).unwrap();
//! assert_eq!(buffer.put("first").unwrap(), 0);
//! assert_eq!(buffer.put("second").unwrap(), 1);
//! assert_eq!(buffer.take().unwrap(), (0, "first"));
//! ```

mod error;
mod ring;
mod semaphore;

pub use error::{BufferError, BufferResult};
pub use ring::BoundedBuffer;
pub use semaphore::Semaphore;
