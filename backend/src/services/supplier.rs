//! Supplier management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::Supplier;
use shared::validation::{validate_email, validate_name};

use crate::error::{AppError, AppResult};

/// Supplier service for managing ingredient suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Supplier row from database
#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    contact_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            contact_name: row.contact_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a supplier
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Input for updating a supplier
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all suppliers
    pub async fn get_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, name, contact_name, email, phone, address, created_at, updated_at
            FROM suppliers
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    /// Get a supplier by ID
    pub async fn get_supplier(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, name, contact_name, email, phone, address, created_at, updated_at
            FROM suppliers
            WHERE id = $1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(row.into())
    }

    /// Create a new supplier
    pub async fn create_supplier(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        // Validate input
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        if let Some(ref email) = input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        // Check for duplicate name
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM suppliers WHERE LOWER(name) = LOWER($1)",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "supplier".to_string(),
                message: "A supplier with this name already exists".to_string(),
            });
        }

        // Create supplier
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (name, contact_name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, contact_name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a supplier
    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        input: UpdateSupplierInput,
    ) -> AppResult<Supplier> {
        // Check if supplier exists
        let existing = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, contact_name, email, phone, address, created_at, updated_at FROM suppliers WHERE id = $1",
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        // Validate new name if provided
        if let Some(ref name) = input.name {
            validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;

            // Check for duplicate name
            let duplicate = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM suppliers WHERE LOWER(name) = LOWER($1) AND id != $2",
            )
            .bind(name)
            .bind(supplier_id)
            .fetch_one(&self.db)
            .await?;

            if duplicate > 0 {
                return Err(AppError::Conflict {
                    resource: "supplier".to_string(),
                    message: "A supplier with this name already exists".to_string(),
                });
            }
        }

        if let Some(ref email) = input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        // Update supplier
        let name = input.name.unwrap_or(existing.name);
        let contact_name = input.contact_name.or(existing.contact_name);
        let email = input.email.or(existing.email);
        let phone = input.phone.or(existing.phone);
        let address = input.address.or(existing.address);

        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            UPDATE suppliers
            SET name = $1, contact_name = $2, email = $3, phone = $4, address = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING id, name, contact_name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&contact_name)
        .bind(&email)
        .bind(&phone)
        .bind(&address)
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a supplier
    pub async fn delete_supplier(&self, supplier_id: Uuid) -> AppResult<()> {
        // Check if supplier exists
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM suppliers WHERE id = $1",
        )
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        // Check if supplier has ingredients
        let ingredient_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ingredients WHERE supplier_id = $1",
        )
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        if ingredient_count > 0 {
            return Err(AppError::Validation {
                field: "supplier_id".to_string(),
                message: format!(
                    "Cannot delete supplier: {} ingredients are linked to it",
                    ingredient_count
                ),
            });
        }

        // Delete supplier
        sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(supplier_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
