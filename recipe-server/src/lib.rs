//! # recipe-server
//!
//! HTTP surface for the recipe store: router, handlers, error mapping, configuration
//! and CLI parsing. Persistence is delegated to [`recipe_storage::RecipeRepository`].

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use app::build_router;
pub use cli::{load_config, Cli, Commands};
pub use config::{ServerConfig, StoreBackend};
pub use state::AppState;
