//! Recipe management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::models::{Recipe, RecipeDetail, RecipeIngredient};

use crate::error::AppResult;
use crate::middleware::auth::require_mutation_access;
use crate::middleware::CurrentUser;
use crate::services::recipe::{
    CreateRecipeInput, RecipeLineInput, UpdateLineInput, UpdateRecipeInput,
};
use crate::services::RecipeService;
use crate::AppState;

/// List all recipes
pub async fn list_recipes(State(state): State<AppState>) -> AppResult<Json<Vec<Recipe>>> {
    let service = RecipeService::new(state.db.clone());
    let recipes = service.get_recipes().await?;
    Ok(Json(recipes))
}

/// Get a recipe with its costed ingredient lines
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<RecipeDetail>> {
    let service = RecipeService::new(state.db.clone());
    let detail = service.get_recipe_detail(recipe_id).await?;
    Ok(Json(detail))
}

/// Create a new recipe
pub async fn create_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateRecipeInput>,
) -> AppResult<(StatusCode, Json<RecipeDetail>)> {
    require_mutation_access(&user)?;

    let service = RecipeService::new(state.db.clone());
    let detail = service.create_recipe(body).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Update a recipe
pub async fn update_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
    Json(body): Json<UpdateRecipeInput>,
) -> AppResult<Json<RecipeDetail>> {
    require_mutation_access(&user)?;

    let service = RecipeService::new(state.db.clone());
    let detail = service.update_recipe(recipe_id, body).await?;
    Ok(Json(detail))
}

/// Delete a recipe
pub async fn delete_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_mutation_access(&user)?;

    let service = RecipeService::new(state.db.clone());
    service.delete_recipe(recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add an ingredient line to a recipe
pub async fn add_recipe_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
    Json(body): Json<RecipeLineInput>,
) -> AppResult<(StatusCode, Json<RecipeIngredient>)> {
    require_mutation_access(&user)?;

    let service = RecipeService::new(state.db.clone());
    let line = service.add_ingredient(recipe_id, body).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// Update an ingredient line quantity
pub async fn update_recipe_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((recipe_id, line_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateLineInput>,
) -> AppResult<Json<RecipeIngredient>> {
    require_mutation_access(&user)?;

    let service = RecipeService::new(state.db.clone());
    let line = service.update_ingredient_line(recipe_id, line_id, body).await?;
    Ok(Json(line))
}

/// Remove an ingredient line from a recipe
pub async fn remove_recipe_ingredient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((recipe_id, line_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    require_mutation_access(&user)?;

    let service = RecipeService::new(state.db.clone());
    service.remove_ingredient(recipe_id, line_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
