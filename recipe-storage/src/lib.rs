//! Storage crate: recipe persistence on a key-value store.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`keys`] – Key schema (counter, index, hashes, lists)
//! - [`kv`] – KvStore trait, batch operations, InMemoryStore
//! - [`repository`] – Repository trait
//! - [`recipe_repo`] – RecipeRepository (save / load / list)
//! - [`redis_pool`] – RedisPoolManager (Redis-backed KvStore)

mod error;
pub mod keys;
pub mod kv;
mod recipe_repo;
mod redis_pool;
mod repository;


pub use error::StorageError;
pub use kv::{InMemoryStore, KvStore, ReadOp, ReadReply, WriteOp};
pub use recipe_repo::{RecipeRepository, PAGE_SIZE};
pub use redis_pool::{RedisConnectOptions, RedisPoolManager};
pub use repository::Repository;
