//! Router for the recipe HTTP surface.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/recipe", post(handlers::create_recipe))
        .route(
            "/recipe/{id}",
            put(handlers::update_recipe).get(handlers::get_recipe),
        )
        .route("/recipes", get(handlers::list_recipes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
