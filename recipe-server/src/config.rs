//! Server config: listen address, store backend, Redis connection, logging. Loaded from env.

use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use recipe_storage::RedisConnectOptions;
use tracing::warn;

/// Which key-value store backs the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    /// Process-local store; data is lost on exit.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" | "inmemory" => Ok(Self::Memory),
            _ => Err(anyhow::anyhow!(
                "STORE_BACKEND must be one of: redis, memory (got {:?})",
                raw
            )),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redis => f.write_str("redis"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// LISTEN_ADDR
    pub listen_addr: String,
    /// STORE_BACKEND
    pub store_backend: StoreBackend,
    /// REDIS_HOST, REDIS_PASSWORD, REDIS_TLS, REDIS_INSECURE_SKIP_VERIFY
    pub redis: RedisConnectOptions,
    /// LOG_FILE; stdout only when unset
    pub log_file: Option<String>,
}

impl ServerConfig {
    /// Load from environment variables. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn load() -> Result<Self> {
        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let store_backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "redis".to_string())
            .parse()?;

        let host = env::var("REDIS_HOST").unwrap_or_else(|_| "localhost:6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty());
        let tls = env_flag("REDIS_TLS", true);
        let insecure_skip_verify = env_flag("REDIS_INSECURE_SKIP_VERIFY", false);

        let log_file = log_file_from_env();

        Ok(Self {
            listen_addr,
            store_backend,
            redis: RedisConnectOptions {
                host,
                password,
                tls,
                insecure_skip_verify,
            },
            log_file,
        })
    }
}

/// LOG_FILE, read on its own so logging can start before the rest of the config loads.
pub fn log_file_from_env() -> Option<String> {
    env::var("LOG_FILE").ok().filter(|p| !p.is_empty())
}

/// Reads a boolean variable; unset uses `default`, unparsable warns and uses `default`.
fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Err(_) => default,
        Ok(raw) => parse_bool(&raw).unwrap_or_else(|| {
            warn!(variable = name, value = %raw, default, "Invalid boolean, using default");
            default
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
