//! Student management handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::models::Student;

use crate::error::AppResult;
use crate::middleware::auth::require_mutation_access;
use crate::middleware::CurrentUser;
use crate::services::student::{CreateStudentInput, UpdateStudentInput};
use crate::services::StudentService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StudentListQuery {
    pub class_id: Option<Uuid>,
}

/// List students, optionally filtered by class
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> AppResult<Json<Vec<Student>>> {
    let service = StudentService::new(state.db.clone());
    let students = service.get_students(query.class_id).await?;
    Ok(Json(students))
}

/// Get a single student
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> AppResult<Json<Student>> {
    let service = StudentService::new(state.db.clone());
    let student = service.get_student(student_id).await?;
    Ok(Json(student))
}

/// Enroll a new student
pub async fn create_student(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateStudentInput>,
) -> AppResult<(StatusCode, Json<Student>)> {
    require_mutation_access(&user)?;

    let service = StudentService::new(state.db.clone());
    let student = service.create_student(body).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Update a student record
pub async fn update_student(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(student_id): Path<Uuid>,
    Json(body): Json<UpdateStudentInput>,
) -> AppResult<Json<Student>> {
    require_mutation_access(&user)?;

    let service = StudentService::new(state.db.clone());
    let student = service.update_student(student_id, body).await?;
    Ok(Json(student))
}

/// Delete a student record
pub async fn delete_student(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(student_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_mutation_access(&user)?;

    let service = StudentService::new(state.db.clone());
    service.delete_student(student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
