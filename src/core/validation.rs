//! Configuration validation error
//!
//! A single user-actionable error type shared by the CLI, the TOML loader and
//! the pipeline parameter checks.

use std::fmt;

/// Invalid startup parameter or configuration file content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    /// Human readable description of what is invalid
    pub fn details(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ValidationError {}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

/// Require `value >= 1`, returning it as a slot count
pub fn require_positive(name: &str, value: i64) -> Result<usize, ValidationError> {
    if value < 1 {
        return Err(ValidationError::new(&format!(
            "{} must be greater than 0 (got {})",
            name, value
        )));
    }
    usize::try_from(value)
        .map_err(|_| ValidationError::new(&format!("{} is too large (got {})", name, value)))
}

/// Require `value >= 0`
pub fn require_non_negative(name: &str, value: i64) -> Result<usize, ValidationError> {
    if value < 0 {
        return Err(ValidationError::new(&format!(
            "{} must be greater than or equal to 0 (got {})",
            name, value
        )));
    }
    usize::try_from(value)
        .map_err(|_| ValidationError::new(&format!("{} is too large (got {})", name, value)))
}

/// Require a 0/1 switch
pub fn require_flag(name: &str, value: i64) -> Result<bool, ValidationError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(ValidationError::new(&format!(
            "{} must be 0 or 1 (got {})",
            name, other
        ))),
    }
}
