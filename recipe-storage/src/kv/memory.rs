//! In-memory implementation of the KvStore trait.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{KvStore, ReadOp, ReadReply, WriteOp};
use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Text(String),
    Hash(HashMap<String, String>),
    List(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Hash,
    List,
}

impl Value {
    fn kind(&self) -> Kind {
        match self {
            Value::Text(_) => Kind::Text,
            Value::Hash(_) => Kind::Hash,
            Value::List(_) => Kind::List,
        }
    }
}

type Entries = HashMap<String, Value>;

fn wrong_type(key: &str) -> StorageError {
    StorageError::Store(format!(
        "WRONGTYPE Operation against a key holding the wrong kind of value: {}",
        key
    ))
}

/// Resolves Redis-style inclusive indices against a list of `len` items.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

/// Process-local store for tests and single-node development.
///
/// Batches are checked for type conflicts before any mutation, so a rejected batch leaves
/// the store untouched.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<Entries>>,
    operations: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls served so far.
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn record_call(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }

    fn check_batch(entries: &Entries, ops: &[WriteOp]) -> Result<(), StorageError> {
        let mut planned: HashMap<&str, Kind> = HashMap::new();
        for op in ops {
            let (key, kind) = match op {
                WriteOp::Append { key, .. } | WriteOp::AppendIfAbsent { key, .. } => {
                    (key.as_str(), Kind::List)
                }
                WriteOp::SetFields { key, .. } => (key.as_str(), Kind::Hash),
            };
            let existing = planned
                .get(key)
                .copied()
                .or_else(|| entries.get(key).map(Value::kind));
            match existing {
                Some(current) if current != kind => return Err(wrong_type(key)),
                _ => {
                    planned.insert(key, kind);
                }
            }
        }
        Ok(())
    }

    fn apply(entries: &mut Entries, op: WriteOp) {
        match op {
            WriteOp::Append { key, values } => {
                Self::push(entries, key, values);
            }
            WriteOp::AppendIfAbsent { key, values } => {
                if !entries.contains_key(&key) {
                    Self::push(entries, key, values);
                }
            }
            WriteOp::SetFields { key, fields } => {
                if let Value::Hash(hash) = entries
                    .entry(key)
                    .or_insert_with(|| Value::Hash(HashMap::new()))
                {
                    hash.extend(fields);
                }
            }
        }
    }

    fn push(entries: &mut Entries, key: String, values: Vec<String>) {
        // Like Redis, an empty push never materializes a key.
        if values.is_empty() {
            return;
        }
        if let Value::List(list) = entries
            .entry(key)
            .or_insert_with(|| Value::List(Vec::new()))
        {
            list.extend(values);
        }
    }

    fn range(entries: &Entries, key: &str, start: isize, stop: isize) -> Result<Vec<String>, StorageError> {
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Value::List(list)) => Ok(resolve_range(list.len(), start, stop)
                .map(|(from, to)| list[from..=to].to_vec())
                .unwrap_or_default()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn read_one(entries: &Entries, op: ReadOp) -> Result<ReadReply, StorageError> {
        match op {
            ReadOp::GetAll { key } => match entries.get(&key) {
                None => Ok(ReadReply::Fields(HashMap::new())),
                Some(Value::Hash(hash)) => Ok(ReadReply::Fields(hash.clone())),
                Some(_) => Err(wrong_type(&key)),
            },
            ReadOp::GetFields { key, fields } => match entries.get(&key) {
                None => Ok(ReadReply::Values(vec![None; fields.len()])),
                Some(Value::Hash(hash)) => Ok(ReadReply::Values(
                    fields.iter().map(|field| hash.get(field).cloned()).collect(),
                )),
                Some(_) => Err(wrong_type(&key)),
            },
            ReadOp::Range { key, start, stop } => {
                Self::range(entries, &key, start, stop).map(ReadReply::List)
            }
        }
    }
}

#[async_trait]
impl KvStore for InMemoryStore {
    async fn incr(&self, key: &str) -> Result<i64, StorageError> {
        self.record_call();
        let mut entries = self.entries.write().await;
        let current = match entries.get(key) {
            None => 0,
            Some(Value::Text(text)) => text.parse::<i64>().map_err(|_| {
                StorageError::Store("ERR value is not an integer or out of range".to_string())
            })?,
            Some(_) => return Err(wrong_type(key)),
        };
        let next = current
            .checked_add(1)
            .ok_or_else(|| StorageError::Store("ERR increment or decrement would overflow".to_string()))?;
        entries.insert(key.to_string(), Value::Text(next.to_string()));
        Ok(next)
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.record_call();
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, StorageError> {
        self.record_call();
        let entries = self.entries.read().await;
        Self::range(&entries, key, start, stop)
    }

    async fn execute_transaction(&self, ops: Vec<WriteOp>) -> Result<(), StorageError> {
        self.record_call();
        let mut entries = self.entries.write().await;
        Self::check_batch(&entries, &ops)?;
        let count = ops.len();
        for op in ops {
            Self::apply(&mut entries, op);
        }
        debug!(ops = count, "In-memory transaction committed");
        Ok(())
    }

    async fn read_batch(&self, ops: Vec<ReadOp>) -> Result<Vec<ReadReply>, StorageError> {
        self.record_call();
        let entries = self.entries.read().await;
        ops.into_iter()
            .map(|op| Self::read_one(&entries, op))
            .collect()
    }
}
