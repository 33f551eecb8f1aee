//! Ingredient management service
//!
//! Ingredient writes normalize unit codes, reject cross-family unit
//! pairings, and recompute the derived usage cost server-side. The stored
//! usage cost is never taken from client input.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::costing::derive_usage_cost;
use shared::models::Ingredient;
use shared::units::{normalize_unit_alias, same_family, Unit};
use shared::validation::{
    validate_name, validate_purchase_cost, validate_purchase_quantity, validate_unit_code,
};

use crate::error::{AppError, AppResult};

/// Ingredient service for managing purchasable ingredients
#[derive(Clone)]
pub struct IngredientService {
    db: PgPool,
}

/// Ingredient row from database
#[derive(Debug, sqlx::FromRow)]
struct IngredientRow {
    id: Uuid,
    supplier_id: Option<Uuid>,
    name: String,
    purchase_unit: String,
    purchase_quantity: f64,
    purchase_cost: f64,
    usage_unit: String,
    usage_cost: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IngredientRow {
    /// Convert to the shared model, rejecting unit codes the schema
    /// constraint should have made impossible
    fn into_model(self) -> AppResult<Ingredient> {
        let purchase_unit = Unit::parse(&self.purchase_unit).ok_or_else(|| {
            AppError::Internal(format!("Unknown unit in database: {}", self.purchase_unit))
        })?;
        let usage_unit = Unit::parse(&self.usage_unit).ok_or_else(|| {
            AppError::Internal(format!("Unknown unit in database: {}", self.usage_unit))
        })?;

        Ok(Ingredient {
            id: self.id,
            supplier_id: self.supplier_id,
            name: self.name,
            purchase_unit,
            purchase_quantity: self.purchase_quantity,
            purchase_cost: self.purchase_cost,
            usage_unit,
            usage_cost: self.usage_cost,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Input for creating an ingredient
#[derive(Debug, Deserialize)]
pub struct CreateIngredientInput {
    pub supplier_id: Option<Uuid>,
    pub name: String,
    pub purchase_unit: String,
    pub purchase_quantity: f64,
    pub purchase_cost: f64,
    pub usage_unit: String,
}

/// Input for updating an ingredient
#[derive(Debug, Deserialize)]
pub struct UpdateIngredientInput {
    pub supplier_id: Option<Uuid>,
    pub name: Option<String>,
    pub purchase_unit: Option<String>,
    pub purchase_quantity: Option<f64>,
    pub purchase_cost: Option<f64>,
    pub usage_unit: Option<String>,
}

impl IngredientService {
    /// Create a new IngredientService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all ingredients
    pub async fn get_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT id, supplier_id, name, purchase_unit, purchase_quantity,
                   purchase_cost, usage_unit, usage_cost, created_at, updated_at
            FROM ingredients
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(IngredientRow::into_model).collect()
    }

    /// Get an ingredient by ID
    pub async fn get_ingredient(&self, ingredient_id: Uuid) -> AppResult<Ingredient> {
        let row = sqlx::query_as::<_, IngredientRow>(
            r#"
            SELECT id, supplier_id, name, purchase_unit, purchase_quantity,
                   purchase_cost, usage_unit, usage_cost, created_at, updated_at
            FROM ingredients
            WHERE id = $1
            "#,
        )
        .bind(ingredient_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        row.into_model()
    }

    /// Create a new ingredient
    pub async fn create_ingredient(&self, input: CreateIngredientInput) -> AppResult<Ingredient> {
        // Validate input
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        // Normalize the legacy liter alias before anything touches the units
        let purchase_unit = normalize_unit_alias(&input.purchase_unit).to_string();
        let usage_unit = normalize_unit_alias(&input.usage_unit).to_string();

        validate_unit_code(&purchase_unit).map_err(|msg| AppError::Validation {
            field: "purchase_unit".to_string(),
            message: msg.to_string(),
        })?;

        validate_unit_code(&usage_unit).map_err(|msg| AppError::Validation {
            field: "usage_unit".to_string(),
            message: msg.to_string(),
        })?;

        // A weight/volume mismatch is a blocking error, never coerced
        if !same_family(&purchase_unit, &usage_unit) {
            return Err(AppError::CrossFamilyConversion {
                from: purchase_unit,
                to: usage_unit,
            });
        }

        validate_purchase_quantity(input.purchase_quantity).map_err(|msg| {
            AppError::Validation {
                field: "purchase_quantity".to_string(),
                message: msg.to_string(),
            }
        })?;

        validate_purchase_cost(input.purchase_cost).map_err(|msg| AppError::Validation {
            field: "purchase_cost".to_string(),
            message: msg.to_string(),
        })?;

        // Check supplier exists if linked
        if let Some(supplier_id) = input.supplier_id {
            let supplier_exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM suppliers WHERE id = $1",
            )
            .bind(supplier_id)
            .fetch_one(&self.db)
            .await?;

            if supplier_exists == 0 {
                return Err(AppError::NotFound("Supplier".to_string()));
            }
        }

        // Check for duplicate name
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ingredients WHERE LOWER(name) = LOWER($1)",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "ingredient".to_string(),
                message: "An ingredient with this name already exists".to_string(),
            });
        }

        // Derive the usage cost from the purchase terms
        let usage_cost = derive_usage_cost(
            input.purchase_cost,
            input.purchase_quantity,
            &purchase_unit,
            &usage_unit,
        );

        // Create ingredient
        let row = sqlx::query_as::<_, IngredientRow>(
            r#"
            INSERT INTO ingredients (supplier_id, name, purchase_unit, purchase_quantity,
                                     purchase_cost, usage_unit, usage_cost)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, supplier_id, name, purchase_unit, purchase_quantity,
                      purchase_cost, usage_unit, usage_cost, created_at, updated_at
            "#,
        )
        .bind(&input.supplier_id)
        .bind(&input.name)
        .bind(&purchase_unit)
        .bind(input.purchase_quantity)
        .bind(input.purchase_cost)
        .bind(&usage_unit)
        .bind(usage_cost)
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    /// Update an ingredient
    pub async fn update_ingredient(
        &self,
        ingredient_id: Uuid,
        input: UpdateIngredientInput,
    ) -> AppResult<Ingredient> {
        // Check if ingredient exists
        let existing = sqlx::query_as::<_, IngredientRow>(
            "SELECT id, supplier_id, name, purchase_unit, purchase_quantity, purchase_cost, usage_unit, usage_cost, created_at, updated_at FROM ingredients WHERE id = $1",
        )
        .bind(ingredient_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        // Validate new name if provided
        if let Some(ref name) = input.name {
            validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;

            // Check for duplicate name
            let duplicate = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM ingredients WHERE LOWER(name) = LOWER($1) AND id != $2",
            )
            .bind(name)
            .bind(ingredient_id)
            .fetch_one(&self.db)
            .await?;

            if duplicate > 0 {
                return Err(AppError::Conflict {
                    resource: "ingredient".to_string(),
                    message: "An ingredient with this name already exists".to_string(),
                });
            }
        }

        // Validate unit codes if provided
        if let Some(ref unit) = input.purchase_unit {
            validate_unit_code(unit).map_err(|msg| AppError::Validation {
                field: "purchase_unit".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(ref unit) = input.usage_unit {
            validate_unit_code(unit).map_err(|msg| AppError::Validation {
                field: "usage_unit".to_string(),
                message: msg.to_string(),
            })?;
        }

        // Validate quantities if provided
        if let Some(quantity) = input.purchase_quantity {
            validate_purchase_quantity(quantity).map_err(|msg| AppError::Validation {
                field: "purchase_quantity".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(cost) = input.purchase_cost {
            validate_purchase_cost(cost).map_err(|msg| AppError::Validation {
                field: "purchase_cost".to_string(),
                message: msg.to_string(),
            })?;
        }

        // Check supplier exists if newly linked
        if let Some(supplier_id) = input.supplier_id {
            let supplier_exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM suppliers WHERE id = $1",
            )
            .bind(supplier_id)
            .fetch_one(&self.db)
            .await?;

            if supplier_exists == 0 {
                return Err(AppError::NotFound("Supplier".to_string()));
            }
        }

        // Merge updates over existing values
        let supplier_id = input.supplier_id.or(existing.supplier_id);
        let name = input.name.unwrap_or(existing.name);
        let purchase_unit = input
            .purchase_unit
            .map(|u| normalize_unit_alias(&u).to_string())
            .unwrap_or(existing.purchase_unit);
        let usage_unit = input
            .usage_unit
            .map(|u| normalize_unit_alias(&u).to_string())
            .unwrap_or(existing.usage_unit);
        let purchase_quantity = input.purchase_quantity.unwrap_or(existing.purchase_quantity);
        let purchase_cost = input.purchase_cost.unwrap_or(existing.purchase_cost);

        // The merged pair must still share a family: changing only the
        // purchase unit can silently cross otherwise
        if !same_family(&purchase_unit, &usage_unit) {
            return Err(AppError::CrossFamilyConversion {
                from: purchase_unit,
                to: usage_unit,
            });
        }

        // Recompute the derived usage cost from the merged purchase terms
        let usage_cost =
            derive_usage_cost(purchase_cost, purchase_quantity, &purchase_unit, &usage_unit);

        let row = sqlx::query_as::<_, IngredientRow>(
            r#"
            UPDATE ingredients
            SET supplier_id = $1, name = $2, purchase_unit = $3, purchase_quantity = $4,
                purchase_cost = $5, usage_unit = $6, usage_cost = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING id, supplier_id, name, purchase_unit, purchase_quantity,
                      purchase_cost, usage_unit, usage_cost, created_at, updated_at
            "#,
        )
        .bind(&supplier_id)
        .bind(&name)
        .bind(&purchase_unit)
        .bind(purchase_quantity)
        .bind(purchase_cost)
        .bind(&usage_unit)
        .bind(usage_cost)
        .bind(ingredient_id)
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    /// Delete an ingredient
    pub async fn delete_ingredient(&self, ingredient_id: Uuid) -> AppResult<()> {
        // Check if ingredient exists
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ingredients WHERE id = $1",
        )
        .bind(ingredient_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Ingredient".to_string()));
        }

        // Check if ingredient is used in recipes
        let line_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE ingredient_id = $1",
        )
        .bind(ingredient_id)
        .fetch_one(&self.db)
        .await?;

        if line_count > 0 {
            return Err(AppError::Validation {
                field: "ingredient_id".to_string(),
                message: format!(
                    "Cannot delete ingredient: {} recipe lines reference it",
                    line_count
                ),
            });
        }

        // Delete ingredient
        sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(ingredient_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
