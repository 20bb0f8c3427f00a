//! Storage error types.
//!
//! Used by the key-value store clients, the recipe repository and callers of storage APIs.

use recipe_core::RecipeError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Rejected before touching the store (invalid id or page).
    #[error(transparent)]
    Invalid(#[from] RecipeError),
    /// Any failure reported by the store connection, including failed batches.
    #[error("store error: {0}")]
    Store(String),
    /// Data read back from the store could not be interpreted.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        StorageError::Store(err.to_string())
    }
}
