pub mod app;
pub mod buffer;
pub mod core;
pub mod pipeline;
pub mod source;
