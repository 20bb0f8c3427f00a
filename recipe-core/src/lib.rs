//! # recipe-core
//!
//! Core types for the recipe store: the [`Recipe`] entity record, the [`PrepPeriod`]
//! duration it carries, identifier validation, and tracing initialization.
//! Store-agnostic; used by the storage crate and the HTTP server.

pub mod error;
pub mod logger;
pub mod prep_period;
pub mod recipe;

pub use error::{RecipeError, Result};
pub use logger::init_tracing;
pub use prep_period::PrepPeriod;
pub use recipe::{validate_id, validate_page, ListAttribute, Recipe};
