//! Class management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::models::{ClassDetail, ClassRecipe, SchoolClass};

use crate::error::AppResult;
use crate::middleware::auth::require_mutation_access;
use crate::middleware::CurrentUser;
use crate::services::school_class::{AssignRecipeInput, CreateClassInput, UpdateClassInput};
use crate::services::ClassService;
use crate::AppState;

/// List all classes
pub async fn list_classes(State(state): State<AppState>) -> AppResult<Json<Vec<SchoolClass>>> {
    let service = ClassService::new(state.db.clone());
    let classes = service.get_classes().await?;
    Ok(Json(classes))
}

/// Get a class with its recipes costed per the enrolled headcount
pub async fn get_class(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
) -> AppResult<Json<ClassDetail>> {
    let service = ClassService::new(state.db.clone());
    let detail = service.get_class_detail(class_id).await?;
    Ok(Json(detail))
}

/// Create a new class
pub async fn create_class(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateClassInput>,
) -> AppResult<(StatusCode, Json<ClassDetail>)> {
    require_mutation_access(&user)?;

    let service = ClassService::new(state.db.clone());
    let detail = service.create_class(body).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Update a class
pub async fn update_class(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(class_id): Path<Uuid>,
    Json(body): Json<UpdateClassInput>,
) -> AppResult<Json<ClassDetail>> {
    require_mutation_access(&user)?;

    let service = ClassService::new(state.db.clone());
    let detail = service.update_class(class_id, body).await?;
    Ok(Json(detail))
}

/// Delete a class
pub async fn delete_class(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(class_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_mutation_access(&user)?;

    let service = ClassService::new(state.db.clone());
    service.delete_class(class_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Assign a recipe to a class
pub async fn assign_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(class_id): Path<Uuid>,
    Json(body): Json<AssignRecipeInput>,
) -> AppResult<(StatusCode, Json<ClassRecipe>)> {
    require_mutation_access(&user)?;

    let service = ClassService::new(state.db.clone());
    let assignment = service.assign_recipe(class_id, body).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Remove a recipe assignment from a class
pub async fn unassign_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((class_id, recipe_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    require_mutation_access(&user)?;

    let service = ClassService::new(state.db.clone());
    service.unassign_recipe(class_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
