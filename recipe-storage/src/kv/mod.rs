//! Key-value store client abstraction.
//!
//! The repository talks to the store only through [`KvStore`]: an atomic counter, per-key
//! hashes and lists, a transactional write batch and a pipelined read batch.
//! [`InMemoryStore`] is the process-local implementation; the Redis implementation lives in
//! [`crate::redis_pool`].

mod memory;

pub use memory::InMemoryStore;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StorageError;

/// One write inside a transactional batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Append values to the tail of a list (RPUSH).
    Append { key: String, values: Vec<String> },
    /// Append values only if the key does not exist yet; evaluated inside the batch.
    AppendIfAbsent { key: String, values: Vec<String> },
    /// Set hash fields, overwriting existing values (HSET).
    SetFields {
        key: String,
        fields: Vec<(String, String)>,
    },
}

/// One read inside a pipelined read batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOp {
    /// Every field of a hash (HGETALL).
    GetAll { key: String },
    /// Selected fields of a hash, `None` for missing ones (HMGET).
    GetFields { key: String, fields: Vec<String> },
    /// Inclusive index range of a list (LRANGE).
    Range {
        key: String,
        start: isize,
        stop: isize,
    },
}

/// Reply to a [`ReadOp`], in the same position as the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadReply {
    Fields(HashMap<String, String>),
    Values(Vec<Option<String>>),
    List(Vec<String>),
}

impl ReadReply {
    pub fn into_fields(self) -> Result<HashMap<String, String>, StorageError> {
        match self {
            ReadReply::Fields(fields) => Ok(fields),
            other => Err(unexpected("fields", &other)),
        }
    }

    pub fn into_values(self) -> Result<Vec<Option<String>>, StorageError> {
        match self {
            ReadReply::Values(values) => Ok(values),
            other => Err(unexpected("values", &other)),
        }
    }

    pub fn into_list(self) -> Result<Vec<String>, StorageError> {
        match self {
            ReadReply::List(list) => Ok(list),
            other => Err(unexpected("list", &other)),
        }
    }
}

fn unexpected(expected: &str, got: &ReadReply) -> StorageError {
    StorageError::Store(format!("expected {} reply, got {:?}", expected, got))
}

/// Store client used by the repository.
///
/// Implementations must make [`KvStore::incr`] atomic and execute
/// [`KvStore::execute_transaction`] all-or-nothing without interleaving other batches.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Increments the integer at `key` by one and returns the new value.
    async fn incr(&self, key: &str) -> Result<i64, StorageError>;

    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Inclusive range with Redis index semantics; negative indices count from the end.
    async fn lrange(&self, key: &str, start: isize, stop: isize)
        -> Result<Vec<String>, StorageError>;

    async fn execute_transaction(&self, ops: Vec<WriteOp>) -> Result<(), StorageError>;

    /// Runs reads in one round trip; replies are positional.
    async fn read_batch(&self, ops: Vec<ReadOp>) -> Result<Vec<ReadReply>, StorageError>;
}
