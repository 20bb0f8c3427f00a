//! Error types for the recipe core.
//!
//! [`RecipeError`] covers input that is rejected before any store access.

use thiserror::Error;

/// Validation and decode failures on recipe values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("invalid id")]
    InvalidId(i64),

    #[error("invalid page")]
    InvalidPage(i64),

    #[error("invalid prep period {input:?}: {reason}")]
    InvalidPrepPeriod { input: String, reason: String },
}

impl RecipeError {
    pub(crate) fn prep_period(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPrepPeriod {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for core operations; uses [`RecipeError`].
pub type Result<T> = std::result::Result<T, RecipeError>;
