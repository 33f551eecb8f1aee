//! Ingredient management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::models::Ingredient;

use crate::error::AppResult;
use crate::middleware::auth::require_mutation_access;
use crate::middleware::CurrentUser;
use crate::services::ingredient::{CreateIngredientInput, UpdateIngredientInput};
use crate::services::IngredientService;
use crate::AppState;

/// List all ingredients
pub async fn list_ingredients(State(state): State<AppState>) -> AppResult<Json<Vec<Ingredient>>> {
    let service = IngredientService::new(state.db.clone());
    let ingredients = service.get_ingredients().await?;
    Ok(Json(ingredients))
}

/// Get a single ingredient
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<Ingredient>> {
    let service = IngredientService::new(state.db.clone());
    let ingredient = service.get_ingredient(ingredient_id).await?;
    Ok(Json(ingredient))
}

/// Create a new ingredient
pub async fn create_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateIngredientInput>,
) -> AppResult<(StatusCode, Json<Ingredient>)> {
    require_mutation_access(&user)?;

    let service = IngredientService::new(state.db.clone());
    let ingredient = service.create_ingredient(body).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// Update an ingredient
pub async fn update_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ingredient_id): Path<Uuid>,
    Json(body): Json<UpdateIngredientInput>,
) -> AppResult<Json<Ingredient>> {
    require_mutation_access(&user)?;

    let service = IngredientService::new(state.db.clone());
    let ingredient = service.update_ingredient(ingredient_id, body).await?;
    Ok(Json(ingredient))
}

/// Delete an ingredient
pub async fn delete_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_mutation_access(&user)?;

    let service = IngredientService::new(state.db.clone());
    service.delete_ingredient(ingredient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
