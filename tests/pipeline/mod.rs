//! Pipeline Integration Test Modules

pub mod backpressure;
pub mod flow;
pub mod shutdown;
