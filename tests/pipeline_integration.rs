//! Pipeline Integration Tests
//!
//! Organized by behaviour:
//! - `pipeline::flow` - filtering, ordering and accounting across threads
//! - `pipeline::backpressure` - producer blocking on a full buffer
//! - `pipeline::shutdown` - stop protocol liveness and reporting

mod common;
mod pipeline;
