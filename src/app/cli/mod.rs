//! CLI module containing argument parsing and configuration file loading

pub mod args;
pub mod config;

pub use args::Args;
pub use config::RawSettings;
