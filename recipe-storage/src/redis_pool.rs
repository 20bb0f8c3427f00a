//! Redis connection wrapper for the storage crate.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, IntoConnectionInfo};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::kv::{KvStore, ReadOp, ReadReply, WriteOp};

/// Appends ARGV to KEYS[1] only when the key does not exist yet. Queued inside MULTI so the
/// check and the append are atomic with the rest of the batch.
const APPEND_IF_ABSENT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return redis.call('RPUSH', KEYS[1], unpack(ARGV))
end
return 0
"#;

/// How to reach the Redis server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConnectOptions {
    /// `host:port`
    pub host: String,
    /// Sent with AUTH when set.
    pub password: Option<String>,
    pub tls: bool,
    /// Accept any server certificate (self-signed deployments).
    pub insecure_skip_verify: bool,
}

impl RedisConnectOptions {
    pub fn connection_info(&self) -> Result<ConnectionInfo, StorageError> {
        let scheme = if self.tls { "rediss" } else { "redis" };
        let mut info = format!("{}://{}", scheme, self.host).into_connection_info()?;
        info.redis.password = self.password.clone().filter(|p| !p.is_empty());
        if let ConnectionAddr::TcpTls { insecure, .. } = &mut info.addr {
            *insecure = self.insecure_skip_verify;
        }
        Ok(info)
    }
}

/// Manages a single multiplexed Redis connection; reconnects on failure.
#[derive(Clone)]
pub struct RedisPoolManager {
    manager: ConnectionManager,
}

impl RedisPoolManager {
    /// Connects using explicit options.
    pub async fn new(options: &RedisConnectOptions) -> Result<Self, StorageError> {
        info!(
            host = %options.host,
            tls = options.tls,
            insecure_skip_verify = options.insecure_skip_verify,
            "Initializing Redis connection"
        );
        Self::open(options.connection_info()?).await
    }

    /// Connects using a connection URL such as `redis://localhost:6379`.
    pub async fn from_url(redis_url: &str) -> Result<Self, StorageError> {
        info!("Initializing Redis connection: {}", redis_url);
        Self::open(redis_url.into_connection_info()?).await
    }

    async fn open(info: ConnectionInfo) -> Result<Self, StorageError> {
        let client = redis::Client::open(info)
            .map_err(|e| StorageError::Store(format!("Failed to create Redis client: {}", e)))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StorageError::Store(format!("Failed to connect to Redis: {}", e)))?;
        Ok(Self { manager })
    }

    /// Returns a handle to the shared connection for running commands.
    pub fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

#[async_trait]
impl KvStore for RedisPoolManager {
    async fn incr(&self, key: &str) -> Result<i64, StorageError> {
        let mut conn = self.connection();
        let value: i64 = conn.incr(key, 1).await?;
        Ok(value)
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let mut conn = self.connection();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn lrange(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, StorageError> {
        let mut conn = self.connection();
        let values: Vec<String> = conn.lrange(key, start, stop).await?;
        Ok(values)
    }

    async fn execute_transaction(&self, ops: Vec<WriteOp>) -> Result<(), StorageError> {
        let mut pipe = redis::pipe();
        pipe.atomic();
        for op in &ops {
            match op {
                // RPUSH without values is a syntax error; an empty list is simply no key.
                WriteOp::Append { values, .. } | WriteOp::AppendIfAbsent { values, .. }
                    if values.is_empty() => {}
                WriteOp::Append { key, values } => {
                    pipe.rpush(key, values).ignore();
                }
                WriteOp::AppendIfAbsent { key, values } => {
                    pipe.cmd("EVAL")
                        .arg(APPEND_IF_ABSENT_SCRIPT)
                        .arg(1)
                        .arg(key)
                        .arg(values)
                        .ignore();
                }
                WriteOp::SetFields { key, fields } => {
                    pipe.hset_multiple(key, fields.as_slice()).ignore();
                }
            }
        }

        let mut conn = self.connection();
        let _: () = pipe.query_async(&mut conn).await?;
        debug!(ops = ops.len(), "Redis transaction committed");
        Ok(())
    }

    async fn read_batch(&self, ops: Vec<ReadOp>) -> Result<Vec<ReadReply>, StorageError> {
        if ops.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for op in &ops {
            match op {
                ReadOp::GetAll { key } => {
                    pipe.hgetall(key);
                }
                ReadOp::GetFields { key, fields } => {
                    pipe.cmd("HMGET").arg(key).arg(fields);
                }
                ReadOp::Range { key, start, stop } => {
                    pipe.lrange(key, *start, *stop);
                }
            }
        }

        let mut conn = self.connection();
        let raw: Vec<redis::Value> = pipe.query_async(&mut conn).await?;
        if raw.len() != ops.len() {
            return Err(StorageError::Store(format!(
                "expected {} pipeline replies, got {}",
                ops.len(),
                raw.len()
            )));
        }

        ops.iter()
            .zip(raw.iter())
            .map(|(op, value)| -> Result<ReadReply, StorageError> {
                let reply = match op {
                    ReadOp::GetAll { .. } => {
                        ReadReply::Fields(redis::from_redis_value::<HashMap<String, String>>(value)?)
                    }
                    ReadOp::GetFields { .. } => {
                        ReadReply::Values(redis::from_redis_value::<Vec<Option<String>>>(value)?)
                    }
                    ReadOp::Range { .. } => {
                        ReadReply::List(redis::from_redis_value::<Vec<String>>(value)?)
                    }
                };
                Ok(reply)
            })
            .collect()
    }
}
