//! User administration service
//!
//! Staff accounts are created by administrators; there is no
//! self-registration.

use bcrypt::{hash, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{Role, User};
use shared::types::RecordStatus;
use shared::validation::{validate_email, validate_name, validate_password};

use crate::error::{AppError, AppResult};

/// User service for managing staff accounts
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// User row from database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_model(self) -> AppResult<User> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            AppError::Internal(format!("Unknown role in database: {}", self.role))
        })?;
        let status = RecordStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("Unknown status in database: {}", self.status))
        })?;

        Ok(User {
            id: self.id,
            email: self.email,
            name: self.name,
            role,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Input for creating a staff account
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Input for updating a staff account
#[derive(Debug, Deserialize)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub password: Option<String>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all users
    pub async fn get_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, role, status, created_at, updated_at
            FROM users
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(UserRow::into_model).collect()
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, role, status, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        row.into_model()
    }

    /// Create a new staff account
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        // Validate input
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        validate_email(&input.email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;

        validate_password(&input.password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
        })?;

        let role = Role::parse(&input.role).ok_or_else(|| AppError::Validation {
            field: "role".to_string(),
            message: "Role must be admin, manager, or tutor".to_string(),
        })?;

        // Check for duplicate email
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        // Hash password
        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        // Create user
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, status, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(role.as_str())
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    /// Update a staff account
    pub async fn update_user(&self, user_id: Uuid, input: UpdateUserInput) -> AppResult<User> {
        // Check if user exists
        let existing = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, role, status, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        // Validate new values if provided
        if let Some(ref name) = input.name {
            validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;
        }

        if let Some(ref email) = input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;

            // Check for duplicate email
            let duplicate = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER($1) AND id != $2",
            )
            .bind(email)
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

            if duplicate > 0 {
                return Err(AppError::DuplicateEntry("email".to_string()));
            }
        }

        let role = match input.role {
            Some(ref role) => Role::parse(role)
                .ok_or_else(|| AppError::Validation {
                    field: "role".to_string(),
                    message: "Role must be admin, manager, or tutor".to_string(),
                })?
                .as_str()
                .to_string(),
            None => existing.role,
        };

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

        // Hash new password if provided
        let password_hash = match input.password {
            Some(ref password) => {
                validate_password(password).map_err(|msg| AppError::Validation {
                    field: "password".to_string(),
                    message: msg.to_string(),
                })?;
                Some(
                    hash(password, DEFAULT_COST).map_err(|e| {
                        AppError::Internal(format!("Password hashing failed: {}", e))
                    })?,
                )
            }
            None => None,
        };

        // Update user
        let name = input.name.unwrap_or(existing.name);
        let email = input.email.unwrap_or(existing.email);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $1, email = $2, role = $3, status = $4,
                password_hash = COALESCE($5, password_hash), updated_at = NOW()
            WHERE id = $6
            RETURNING id, email, name, role, status, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&email)
        .bind(&role)
        .bind(&status)
        .bind(&password_hash)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    /// Delete a staff account
    pub async fn delete_user(&self, user_id: Uuid, acting_user_id: Uuid) -> AppResult<()> {
        if user_id == acting_user_id {
            return Err(AppError::Validation {
                field: "user_id".to_string(),
                message: "You cannot delete your own account".to_string(),
            });
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }
}
