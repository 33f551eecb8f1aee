//! Student management service

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::Student;
use shared::types::RecordStatus;
use shared::validation::{validate_email, validate_name};

use crate::error::{AppError, AppResult};

/// Student service for managing enrolled students
#[derive(Clone)]
pub struct StudentService {
    db: PgPool,
}

/// Student row from database
#[derive(Debug, sqlx::FromRow)]
struct StudentRow {
    id: Uuid,
    class_id: Option<Uuid>,
    first_name: String,
    last_name: String,
    email: Option<String>,
    status: String,
    enrolled_on: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StudentRow {
    fn into_model(self) -> AppResult<Student> {
        let status = RecordStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("Unknown status in database: {}", self.status))
        })?;

        Ok(Student {
            id: self.id,
            class_id: self.class_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            status,
            enrolled_on: self.enrolled_on,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Input for enrolling a student
#[derive(Debug, Deserialize)]
pub struct CreateStudentInput {
    pub class_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub enrolled_on: Option<NaiveDate>,
}

/// Input for updating a student
#[derive(Debug, Deserialize)]
pub struct UpdateStudentInput {
    pub class_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

impl StudentService {
    /// Create a new StudentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all students, optionally filtered by class
    pub async fn get_students(&self, class_id: Option<Uuid>) -> AppResult<Vec<Student>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, class_id, first_name, last_name, email, status,
                   enrolled_on, created_at, updated_at
            FROM students
            WHERE ($1::uuid IS NULL OR class_id = $1)
            ORDER BY last_name ASC, first_name ASC
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(StudentRow::into_model).collect()
    }

    /// Get a student by ID
    pub async fn get_student(&self, student_id: Uuid) -> AppResult<Student> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, class_id, first_name, last_name, email, status,
                   enrolled_on, created_at, updated_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student".to_string()))?;

        row.into_model()
    }

    /// Enroll a new student
    pub async fn create_student(&self, input: CreateStudentInput) -> AppResult<Student> {
        // Validate input
        validate_name(&input.first_name).map_err(|msg| AppError::Validation {
            field: "first_name".to_string(),
            message: msg.to_string(),
        })?;

        validate_name(&input.last_name).map_err(|msg| AppError::Validation {
            field: "last_name".to_string(),
            message: msg.to_string(),
        })?;

        if let Some(ref email) = input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        // Check class exists if assigned
        if let Some(class_id) = input.class_id {
            let class_exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM classes WHERE id = $1",
            )
            .bind(class_id)
            .fetch_one(&self.db)
            .await?;

            if class_exists == 0 {
                return Err(AppError::NotFound("Class".to_string()));
            }
        }

        // Create student
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            INSERT INTO students (class_id, first_name, last_name, email, enrolled_on)
            VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE))
            RETURNING id, class_id, first_name, last_name, email, status,
                      enrolled_on, created_at, updated_at
            "#,
        )
        .bind(&input.class_id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(input.enrolled_on)
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    /// Update a student
    pub async fn update_student(
        &self,
        student_id: Uuid,
        input: UpdateStudentInput,
    ) -> AppResult<Student> {
        // Check if student exists
        let existing = sqlx::query_as::<_, StudentRow>(
            "SELECT id, class_id, first_name, last_name, email, status, enrolled_on, created_at, updated_at FROM students WHERE id = $1",
        )
        .bind(student_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student".to_string()))?;

        // Validate new values if provided
        if let Some(ref first_name) = input.first_name {
            validate_name(first_name).map_err(|msg| AppError::Validation {
                field: "first_name".to_string(),
                message: msg.to_string(),
            })?;
        }

        if let Some(ref last_name) = input.last_name {
            validate_name(last_name).map_err(|msg| AppError::Validation {
                field: "last_name".to_string(),
                message: msg.to_string(),
            })?;
        }

        if let Some(ref email) = input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        let status = match input.status {
            Some(ref status) => RecordStatus::parse(status)
                .ok_or_else(|| AppError::Validation {
                    field: "status".to_string(),
                    message: "Status must be active or inactive".to_string(),
                })?
                .as_str()
                .to_string(),
            None => existing.status,
        };

        // Check class exists if newly assigned
        if let Some(class_id) = input.class_id {
            let class_exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM classes WHERE id = $1",
            )
            .bind(class_id)
            .fetch_one(&self.db)
            .await?;

            if class_exists == 0 {
                return Err(AppError::NotFound("Class".to_string()));
            }
        }

        // Update student
        let class_id = input.class_id.or(existing.class_id);
        let first_name = input.first_name.unwrap_or(existing.first_name);
        let last_name = input.last_name.unwrap_or(existing.last_name);
        let email = input.email.or(existing.email);

        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            UPDATE students
            SET class_id = $1, first_name = $2, last_name = $3, email = $4,
                status = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING id, class_id, first_name, last_name, email, status,
                      enrolled_on, created_at, updated_at
            "#,
        )
        .bind(&class_id)
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&status)
        .bind(student_id)
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    /// Delete a student
    pub async fn delete_student(&self, student_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(student_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Student".to_string()));
        }

        Ok(())
    }
}
