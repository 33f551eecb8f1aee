//! Supplier management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::models::Supplier;

use crate::error::AppResult;
use crate::middleware::auth::require_mutation_access;
use crate::middleware::CurrentUser;
use crate::services::supplier::{CreateSupplierInput, UpdateSupplierInput};
use crate::services::SupplierService;
use crate::AppState;

/// List all suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db.clone());
    let suppliers = service.get_suppliers().await?;
    Ok(Json(suppliers))
}

/// Get a single supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db.clone());
    let supplier = service.get_supplier(supplier_id).await?;
    Ok(Json(supplier))
}

/// Create a new supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateSupplierInput>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    require_mutation_access(&user)?;

    let service = SupplierService::new(state.db.clone());
    let supplier = service.create_supplier(body).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(body): Json<UpdateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    require_mutation_access(&user)?;

    let service = SupplierService::new(state.db.clone());
    let supplier = service.update_supplier(supplier_id, body).await?;
    Ok(Json(supplier))
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_mutation_access(&user)?;

    let service = SupplierService::new(state.db.clone());
    service.delete_supplier(supplier_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
