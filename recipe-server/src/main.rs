//! recipe-server: serve the recipe API on top of Redis or the in-memory store.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use recipe_core::init_tracing;
use recipe_server::config::log_file_from_env;
use recipe_server::{build_router, load_config, AppState, Cli, Commands, ServerConfig, StoreBackend};
use recipe_storage::{InMemoryStore, KvStore, RecipeRepository, RedisPoolManager};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen, store } => {
            init_tracing(log_file_from_env().as_deref())?;
            let config = load_config(listen, store)?;
            serve(config).await
        }
    }
}

async fn open_store(config: &ServerConfig) -> Result<Arc<dyn KvStore>> {
    match config.store_backend {
        StoreBackend::Redis => {
            let store = RedisPoolManager::new(&config.redis)
                .await
                .with_context(|| format!("failed to connect to Redis at {}", config.redis.host))?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(InMemoryStore::new())),
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    info!(backend = %config.store_backend, log_file = ?config.log_file, "Opening recipe store");
    let store = open_store(&config).await?;

    let app = build_router(AppState::new(RecipeRepository::new(store)));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.listen_addr))?;

    info!(address = %config.listen_addr, "Recipe server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Recipe server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
