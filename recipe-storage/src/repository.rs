//! Repository abstraction over entity persistence.

use async_trait::async_trait;

use crate::error::StorageError;

/// Persistence operations for one entity type.
///
/// `save` creates when the entity has no id yet and assigns one in place; otherwise it
/// updates the entity stored under its id.
#[async_trait]
pub trait Repository<T> {
    async fn save(&self, entity: &mut T) -> Result<(), StorageError>;
    async fn load(&self, id: i64) -> Result<T, StorageError>;
    async fn list(&self, page: i64) -> Result<Vec<T>, StorageError>;
}
