//! Staff account administration handlers
//!
//! Every route here requires the admin role, including reads.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::models::User;

use crate::error::AppResult;
use crate::middleware::auth::require_user_management_access;
use crate::middleware::CurrentUser;
use crate::services::user::{CreateUserInput, UpdateUserInput};
use crate::services::UserService;
use crate::AppState;

/// List all staff accounts
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    require_user_management_access(&user)?;

    let service = UserService::new(state.db.clone());
    let users = service.get_users().await?;
    Ok(Json(users))
}

/// Get a single staff account
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    require_user_management_access(&user)?;

    let service = UserService::new(state.db.clone());
    let account = service.get_user(user_id).await?;
    Ok(Json(account))
}

/// Create a staff account
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    require_user_management_access(&user)?;

    let service = UserService::new(state.db.clone());
    let account = service.create_user(body).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Update a staff account
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateUserInput>,
) -> AppResult<Json<User>> {
    require_user_management_access(&user)?;

    let service = UserService::new(state.db.clone());
    let account = service.update_user(user_id, body).await?;
    Ok(Json(account))
}

/// Delete a staff account
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_user_management_access(&user)?;

    let service = UserService::new(state.db.clone());
    service.delete_user(user_id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
