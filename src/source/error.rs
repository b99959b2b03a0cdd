//! Item Source Error Types

use std::fmt;

/// Item source error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The process table could not be opened
    Io { path: String, message: String },
    /// This platform has no process table we can read
    Unsupported { platform: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { path, message } => write!(f, "Cannot read {}: {}", path, message),
            SourceError::Unsupported { platform } => {
                write!(f, "Process table source is not supported on {}", platform)
            }
        }
    }
}

impl std::error::Error for SourceError {}

impl crate::core::error_handling::ContextualError for SourceError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

pub type SourceResult<T> = Result<T, SourceError>;
