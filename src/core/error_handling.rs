//! Generic error handling utilities
//!
//! Provides unified error reporting across the configuration, buffer and
//! pipeline error types while keeping user-facing output short.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on
    /// directly (invalid parameters, unreadable config file)
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors log their own message; system errors log the
/// operation context. Full detail always goes to debug level.
///
/// # Examples
/// ```rust,no_run
/// # use proctally::core::error_handling::log_error_with_context;
/// # use proctally::core::validation::ValidationError;
/// let err = ValidationError::new("buffer_size must be greater than 0");
/// log_error_with_context(&err, "Pipeline startup");
/// // Logs: "FATAL: buffer_size must be greater than 0"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}: {}", operation_context, error),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
