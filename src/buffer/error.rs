//! Buffer Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// A blocking wait was cancelled before it acquired anything
    #[error("Wait interrupted")]
    Interrupted,

    #[error("Buffer lock poisoned: {message}")]
    Poisoned { message: String },

    #[error("Cannot allocate buffer storage for {capacity} slots")]
    Allocation { capacity: usize },
}

impl crate::core::error_handling::ContextualError for BufferError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;
