use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use recipe_core::{validate_id, Recipe};
use recipe_storage::StorageError;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

/// `POST /recipe`: creates a recipe; any id in the body is ignored.
pub async fn create_recipe(
    State(state): State<AppState>,
    payload: Result<Json<Recipe>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    let Json(mut recipe) = payload.map_err(|e| AppError::decode(e.body_text()))?;
    recipe.id = 0;

    state.repo.save(&mut recipe).await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// `PUT /recipe/{id}`: updates the recipe stored under the path id.
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Recipe>, JsonRejection>,
) -> AppResult<Json<Recipe>> {
    // A zero id would turn the update into a create.
    let id = validate_id(parse_id(&raw_id)?).map_err(StorageError::from)?;
    let Json(mut recipe) = payload.map_err(|e| AppError::decode(e.body_text()))?;
    recipe.id = id;

    state.repo.save(&mut recipe).await?;

    Ok(Json(recipe))
}

/// `GET /recipe/{id}`
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Recipe>> {
    let recipe = state.repo.load(parse_id(&raw_id)?).await?;
    Ok(Json(recipe))
}

/// `GET /recipes?page=N`: id and title of one page of recipes.
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<Vec<Recipe>>> {
    let raw_page = params.get("page").ok_or(AppError::MissingPage)?;
    let page = raw_page
        .parse::<i64>()
        .map_err(|_| AppError::decode(format!("invalid page {:?}", raw_page)))?;

    let recipes = state.repo.list(page).await?;
    Ok(Json(recipes))
}

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::decode(format!("invalid id {:?}", raw)))
}
