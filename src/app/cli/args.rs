//! Command-line arguments
//!
//! Numeric pipeline parameters are parsed as signed integers so that values
//! such as `--consumers -1` reach validation and are reported as
//! configuration errors instead of clap usage errors.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "proctally")]
#[command(about = "Tally how long a user's processes have been running")]
#[command(version = crate::core::version::long_version())]
pub struct Args {
    /// Number of buffer slots [default: 10]
    #[arg(short = 'b', long = "buffer-size", value_name = "N", allow_negative_numbers = true)]
    pub buffer_size: Option<i64>,

    /// Run the producer (1) or not (0) [default: 1]
    #[arg(short = 'p', long = "producers", value_name = "0|1", allow_negative_numbers = true)]
    pub producers: Option<i64>,

    /// Number of consumer threads [default: 1]
    #[arg(short = 'n', long = "consumers", value_name = "N", allow_negative_numbers = true)]
    pub consumers: Option<i64>,

    /// Only processes owned by this uid are produced [default: 0]
    #[arg(short = 'u', long = "uid", value_name = "UID")]
    pub uid: Option<u32>,

    /// Stop automatically after this many seconds
    #[arg(short = 't', long = "run-for", value_name = "SECONDS")]
    pub run_for: Option<u64>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored log output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Args {
    /// Whether log output should be colored, given whether stderr is a terminal
    pub fn use_color(&self, is_terminal: bool) -> bool {
        (self.color || is_terminal) && !self.no_color
    }
}
