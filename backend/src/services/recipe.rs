//! Recipe management service
//!
//! Recipe reads roll ingredient costs up with the shared costing
//! aggregator so the API totals always match what the dashboard's cost
//! sheet computes client-side.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::costing::{order_total, scaled_cost};
use shared::models::{Recipe, RecipeDetail, RecipeIngredient, RecipeIngredientDetail};
use shared::units::Unit;
use shared::validation::{validate_line_quantity, validate_name};

use crate::error::{AppError, AppResult};

/// Recipe service for managing taught recipes
#[derive(Clone)]
pub struct RecipeService {
    db: PgPool,
}

/// Recipe row from database
#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    servings: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            name: row.name,
            description: row.description,
            servings: row.servings,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Ingredient line row joined with ingredient data
#[derive(Debug, sqlx::FromRow)]
struct RecipeLineRow {
    id: Uuid,
    ingredient_id: Uuid,
    ingredient_name: String,
    quantity: f64,
    usage_unit: String,
    usage_cost: Option<f64>,
}

/// Plain ingredient line row
#[derive(Debug, sqlx::FromRow)]
struct RecipeIngredientRow {
    id: Uuid,
    recipe_id: Uuid,
    ingredient_id: Uuid,
    quantity: f64,
}

impl From<RecipeIngredientRow> for RecipeIngredient {
    fn from(row: RecipeIngredientRow) -> Self {
        RecipeIngredient {
            id: row.id,
            recipe_id: row.recipe_id,
            ingredient_id: row.ingredient_id,
            quantity: row.quantity,
        }
    }
}

/// Input for creating a recipe
#[derive(Debug, Deserialize)]
pub struct CreateRecipeInput {
    pub name: String,
    pub description: Option<String>,
    pub servings: i32,
    pub ingredients: Option<Vec<RecipeLineInput>>,
}

/// Input for one ingredient line
#[derive(Debug, Deserialize)]
pub struct RecipeLineInput {
    pub ingredient_id: Uuid,
    pub quantity: f64,
}

/// Input for updating a recipe
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub servings: Option<i32>,
}

/// Input for updating an ingredient line quantity
#[derive(Debug, Deserialize)]
pub struct UpdateLineInput {
    pub quantity: f64,
}

impl RecipeService {
    /// Create a new RecipeService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all recipes
    pub async fn get_recipes(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, name, description, servings, created_at, updated_at
            FROM recipes
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    /// Get a recipe by ID with its costed ingredient lines
    pub async fn get_recipe_detail(&self, recipe_id: Uuid) -> AppResult<RecipeDetail> {
        // Get recipe
        let recipe = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, name, description, servings, created_at, updated_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(recipe_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        // Get ingredient lines with current ingredient pricing
        let line_rows = sqlx::query_as::<_, RecipeLineRow>(
            r#"
            SELECT ri.id, ri.ingredient_id, i.name AS ingredient_name,
                   ri.quantity, i.usage_unit, i.usage_cost
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY i.name ASC
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.db)
        .await?;

        let mut ingredients = Vec::with_capacity(line_rows.len());
        for row in line_rows {
            let usage_unit = Unit::parse(&row.usage_unit).ok_or_else(|| {
                AppError::Internal(format!("Unknown unit in database: {}", row.usage_unit))
            })?;

            // Line total is quantity x unit cost; lines without a usable
            // unit cost stay unpriced rather than showing a fake zero
            let total_cost = row
                .usage_cost
                .filter(|cost| cost.is_finite())
                .map(|cost| scaled_cost(cost, Some(row.quantity)));

            ingredients.push(RecipeIngredientDetail {
                id: row.id,
                ingredient_id: row.ingredient_id,
                ingredient_name: row.ingredient_name,
                quantity: row.quantity,
                usage_unit,
                unit_cost: row.usage_cost,
                total_cost,
            });
        }

        let cost_lines: Vec<_> = ingredients.iter().map(|line| line.to_cost_line()).collect();
        let total_cost = order_total(&cost_lines, None);

        Ok(RecipeDetail {
            recipe: recipe.into(),
            ingredients,
            total_cost,
        })
    }

    /// Create a new recipe
    pub async fn create_recipe(&self, input: CreateRecipeInput) -> AppResult<RecipeDetail> {
        // Validate input
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        if input.servings < 1 {
            return Err(AppError::Validation {
                field: "servings".to_string(),
                message: "Servings must be at least 1".to_string(),
            });
        }

        if let Some(ref lines) = input.ingredients {
            for line in lines {
                validate_line_quantity(line.quantity).map_err(|msg| AppError::Validation {
                    field: "quantity".to_string(),
                    message: msg.to_string(),
                })?;
            }
        }

        // Check for duplicate name
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM recipes WHERE LOWER(name) = LOWER($1)",
        )
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "recipe".to_string(),
                message: "A recipe with this name already exists".to_string(),
            });
        }

        // Start transaction
        let mut tx = self.db.begin().await?;

        // Create recipe
        let recipe_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO recipes (name, description, servings)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.servings)
        .fetch_one(&mut *tx)
        .await?;

        // Add ingredient lines if provided
        if let Some(lines) = input.ingredients {
            for line in lines {
                let ingredient_exists = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM ingredients WHERE id = $1",
                )
                .bind(line.ingredient_id)
                .fetch_one(&mut *tx)
                .await?;

                if ingredient_exists == 0 {
                    return Err(AppError::NotFound("Ingredient".to_string()));
                }

                sqlx::query(
                    r#"
                    INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(recipe_id)
                .bind(line.ingredient_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        // Return the created recipe with costed lines
        self.get_recipe_detail(recipe_id).await
    }

    /// Update a recipe
    pub async fn update_recipe(
        &self,
        recipe_id: Uuid,
        input: UpdateRecipeInput,
    ) -> AppResult<RecipeDetail> {
        // Check if recipe exists
        let existing = sqlx::query_as::<_, RecipeRow>(
            "SELECT id, name, description, servings, created_at, updated_at FROM recipes WHERE id = $1",
        )
        .bind(recipe_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        // Validate new name if provided
        if let Some(ref name) = input.name {
            validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;

            // Check for duplicate name
            let duplicate = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM recipes WHERE LOWER(name) = LOWER($1) AND id != $2",
            )
            .bind(name)
            .bind(recipe_id)
            .fetch_one(&self.db)
            .await?;

            if duplicate > 0 {
                return Err(AppError::Conflict {
                    resource: "recipe".to_string(),
                    message: "A recipe with this name already exists".to_string(),
                });
            }
        }

        if let Some(servings) = input.servings {
            if servings < 1 {
                return Err(AppError::Validation {
                    field: "servings".to_string(),
                    message: "Servings must be at least 1".to_string(),
                });
            }
        }

        // Update recipe
        let name = input.name.unwrap_or(existing.name);
        let description = input.description.or(existing.description);
        let servings = input.servings.unwrap_or(existing.servings);

        sqlx::query(
            r#"
            UPDATE recipes
            SET name = $1, description = $2, servings = $3, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(servings)
        .bind(recipe_id)
        .execute(&self.db)
        .await?;

        // Return updated recipe with costed lines
        self.get_recipe_detail(recipe_id).await
    }

    /// Delete a recipe
    pub async fn delete_recipe(&self, recipe_id: Uuid) -> AppResult<()> {
        // Check if recipe exists
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM recipes WHERE id = $1",
        )
        .bind(recipe_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Recipe".to_string()));
        }

        // Check if recipe is assigned to classes
        let class_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM class_recipes WHERE recipe_id = $1",
        )
        .bind(recipe_id)
        .fetch_one(&self.db)
        .await?;

        if class_count > 0 {
            return Err(AppError::Validation {
                field: "recipe_id".to_string(),
                message: format!(
                    "Cannot delete recipe: {} classes have it assigned",
                    class_count
                ),
            });
        }

        // Delete recipe (cascade will delete ingredient lines)
        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Add an ingredient line to a recipe
    pub async fn add_ingredient(
        &self,
        recipe_id: Uuid,
        input: RecipeLineInput,
    ) -> AppResult<RecipeIngredient> {
        // Check if recipe exists
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM recipes WHERE id = $1",
        )
        .bind(recipe_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Recipe".to_string()));
        }

        // Check if ingredient exists
        let ingredient_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ingredients WHERE id = $1",
        )
        .bind(input.ingredient_id)
        .fetch_one(&self.db)
        .await?;

        if ingredient_exists == 0 {
            return Err(AppError::NotFound("Ingredient".to_string()));
        }

        validate_line_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        // Check for duplicate line
        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE recipe_id = $1 AND ingredient_id = $2",
        )
        .bind(recipe_id)
        .bind(input.ingredient_id)
        .fetch_one(&self.db)
        .await?;

        if duplicate > 0 {
            return Err(AppError::Conflict {
                resource: "ingredient".to_string(),
                message: "This ingredient is already on the recipe".to_string(),
            });
        }

        // Insert line
        let row = sqlx::query_as::<_, RecipeIngredientRow>(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING id, recipe_id, ingredient_id, quantity
            "#,
        )
        .bind(recipe_id)
        .bind(input.ingredient_id)
        .bind(input.quantity)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update an ingredient line quantity
    pub async fn update_ingredient_line(
        &self,
        recipe_id: Uuid,
        line_id: Uuid,
        input: UpdateLineInput,
    ) -> AppResult<RecipeIngredient> {
        validate_line_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let row = sqlx::query_as::<_, RecipeIngredientRow>(
            r#"
            UPDATE recipe_ingredients
            SET quantity = $1
            WHERE id = $2 AND recipe_id = $3
            RETURNING id, recipe_id, ingredient_id, quantity
            "#,
        )
        .bind(input.quantity)
        .bind(line_id)
        .bind(recipe_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe ingredient".to_string()))?;

        Ok(row.into())
    }

    /// Remove an ingredient line from a recipe
    pub async fn remove_ingredient(&self, recipe_id: Uuid, line_id: Uuid) -> AppResult<()> {
        // Check if recipe exists
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM recipes WHERE id = $1",
        )
        .bind(recipe_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Recipe".to_string()));
        }

        // Delete line
        let result = sqlx::query(
            "DELETE FROM recipe_ingredients WHERE id = $1 AND recipe_id = $2",
        )
        .bind(line_id)
        .bind(recipe_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe ingredient".to_string()));
        }

        Ok(())
    }
}
