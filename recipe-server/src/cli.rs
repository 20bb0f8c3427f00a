//! CLI parser.

use clap::{Parser, Subcommand};

use crate::config::{ServerConfig, StoreBackend};

#[derive(Parser)]
#[command(name = "recipe-server")]
#[command(about = "Recipe store HTTP server", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the recipe API (config from env; flags override LISTEN_ADDR and STORE_BACKEND).
    Serve {
        #[arg(short, long)]
        listen: Option<String>,
        /// `redis` or `memory`
        #[arg(short, long)]
        store: Option<StoreBackend>,
    },
}

/// Load ServerConfig from environment and apply command-line overrides.
pub fn load_config(
    listen: Option<String>,
    store: Option<StoreBackend>,
) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::load()?;
    if let Some(listen) = listen {
        config.listen_addr = listen;
    }
    if let Some(store) = store {
        config.store_backend = store;
    }
    Ok(config)
}
