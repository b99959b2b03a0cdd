//! Validated pipeline parameters

use crate::core::validation::{
    require_flag, require_non_negative, require_positive, ValidationError,
};
use std::num::NonZeroUsize;

/// Immutable, validated startup parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of buffer slots
    pub capacity: NonZeroUsize,
    /// Whether the producer runs at all
    pub producer_enabled: bool,
    /// Number of consumer instances
    pub consumer_count: usize,
    /// Only items owned by this id are produced
    pub owner_filter: u32,
}

impl PipelineConfig {
    /// Validate raw parameters
    ///
    /// `buffer_size` must be at least 1, `producers` 0 or 1 and `consumers`
    /// non-negative. Nothing is allocated here.
    pub fn validate(
        buffer_size: i64,
        producers: i64,
        consumers: i64,
        owner_filter: u32,
    ) -> Result<Self, ValidationError> {
        let capacity = require_positive("buffer_size", buffer_size)?;
        let producer_enabled = require_flag("producers", producers)?;
        let consumer_count = require_non_negative("consumers", consumers)?;

        Ok(Self {
            capacity: NonZeroUsize::new(capacity)
                .ok_or_else(|| ValidationError::new("buffer_size must be greater than 0"))?,
            producer_enabled,
            consumer_count,
            owner_filter,
        })
    }
}
