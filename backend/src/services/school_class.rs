//! Class management service
//!
//! Class reads compute per-student recipe costs and scale them by the
//! enrolled headcount with the shared costing aggregator, repricing every
//! line so the per-line totals always agree with the grand total.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::costing::{order_total, reprice_lines, scaled_cost, CostLine};
use shared::models::{ClassDetail, ClassRecipe, ClassRecipeDetail, SchoolClass};
use shared::validation::{validate_name, validate_student_count};

use crate::error::{AppError, AppResult};

/// Class service for managing scheduled classes
#[derive(Clone)]
pub struct ClassService {
    db: PgPool,
}

/// Class row from database
#[derive(Debug, sqlx::FromRow)]
struct ClassRow {
    id: Uuid,
    name: String,
    start_date: NaiveDate,
    student_count: i32,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClassRow> for SchoolClass {
    fn from(row: ClassRow) -> Self {
        SchoolClass {
            id: row.id,
            name: row.name,
            start_date: row.start_date,
            student_count: row.student_count,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Recipe assignment row
#[derive(Debug, sqlx::FromRow)]
struct ClassRecipeRow {
    id: Uuid,
    class_id: Uuid,
    recipe_id: Uuid,
}

impl From<ClassRecipeRow> for ClassRecipe {
    fn from(row: ClassRecipeRow) -> Self {
        ClassRecipe {
            id: row.id,
            class_id: row.class_id,
            recipe_id: row.recipe_id,
        }
    }
}

/// Assignment joined with recipe name
#[derive(Debug, sqlx::FromRow)]
struct AssignedRecipeRow {
    recipe_id: Uuid,
    recipe_name: String,
}

/// Ingredient line cost row for the recipes of one class
#[derive(Debug, sqlx::FromRow)]
struct RecipeLineCostRow {
    recipe_id: Uuid,
    quantity: f64,
    usage_cost: Option<f64>,
}

/// Input for creating a class
#[derive(Debug, Deserialize)]
pub struct CreateClassInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub student_count: i32,
    pub notes: Option<String>,
    pub recipe_ids: Option<Vec<Uuid>>,
}

/// Input for updating a class
#[derive(Debug, Deserialize)]
pub struct UpdateClassInput {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub student_count: Option<i32>,
    pub notes: Option<String>,
}

/// Input for assigning a recipe to a class
#[derive(Debug, Deserialize)]
pub struct AssignRecipeInput {
    pub recipe_id: Uuid,
}

impl ClassService {
    /// Create a new ClassService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all classes
    pub async fn get_classes(&self) -> AppResult<Vec<SchoolClass>> {
        let rows = sqlx::query_as::<_, ClassRow>(
            r#"
            SELECT id, name, start_date, student_count, notes, created_at, updated_at
            FROM classes
            ORDER BY start_date DESC, name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(SchoolClass::from).collect())
    }

    /// Get a class by ID with its costed recipe assignments
    pub async fn get_class_detail(&self, class_id: Uuid) -> AppResult<ClassDetail> {
        // Get class
        let class = sqlx::query_as::<_, ClassRow>(
            r#"
            SELECT id, name, start_date, student_count, notes, created_at, updated_at
            FROM classes
            WHERE id = $1
            "#,
        )
        .bind(class_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Class".to_string()))?;

        // Get assigned recipes
        let assigned = sqlx::query_as::<_, AssignedRecipeRow>(
            r#"
            SELECT cr.recipe_id, r.name AS recipe_name
            FROM class_recipes cr
            JOIN recipes r ON r.id = cr.recipe_id
            WHERE cr.class_id = $1
            ORDER BY r.name ASC
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.db)
        .await?;

        // Get ingredient line costs for every assigned recipe in one pass
        let line_rows = sqlx::query_as::<_, RecipeLineCostRow>(
            r#"
            SELECT ri.recipe_id, ri.quantity, i.usage_cost
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id IN (
                SELECT recipe_id FROM class_recipes WHERE class_id = $1
            )
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.db)
        .await?;

        // Roll each recipe's ingredient lines up to a per-student unit cost
        let mut lines_by_recipe: HashMap<Uuid, Vec<CostLine>> = HashMap::new();
        for row in line_rows {
            let total_cost = row
                .usage_cost
                .filter(|cost| cost.is_finite())
                .map(|cost| scaled_cost(cost, Some(row.quantity)));

            lines_by_recipe
                .entry(row.recipe_id)
                .or_default()
                .push(CostLine {
                    reference: row.recipe_id,
                    quantity: Some(row.quantity),
                    unit_cost: row.usage_cost,
                    total_cost,
                });
        }

        let mut recipes = Vec::with_capacity(assigned.len());
        for assignment in &assigned {
            let unit_cost = lines_by_recipe
                .get(&assignment.recipe_id)
                .map(|lines| order_total(lines, None))
                .unwrap_or(0.0);

            recipes.push(ClassRecipeDetail {
                recipe_id: assignment.recipe_id,
                recipe_name: assignment.recipe_name.clone(),
                unit_cost: Some(unit_cost),
                total_cost: None,
            });
        }

        // Scale every recipe line by the enrolled headcount, keeping the
        // per-line totals and the grand total consistent
        let multiplier = Some(class.student_count as f64);
        let mut cost_lines: Vec<_> = recipes.iter().map(|line| line.to_cost_line()).collect();
        reprice_lines(&mut cost_lines, multiplier);

        for (detail, line) in recipes.iter_mut().zip(&cost_lines) {
            detail.total_cost = line.total_cost;
        }

        let total_cost = order_total(&cost_lines, multiplier);

        Ok(ClassDetail {
            class: class.into(),
            recipes,
            total_cost,
        })
    }

    /// Create a new class
    pub async fn create_class(&self, input: CreateClassInput) -> AppResult<ClassDetail> {
        // Validate input
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        validate_student_count(input.student_count).map_err(|msg| AppError::Validation {
            field: "student_count".to_string(),
            message: msg.to_string(),
        })?;

        // Start transaction
        let mut tx = self.db.begin().await?;

        // Create class
        let class_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO classes (name, start_date, student_count, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(input.start_date)
        .bind(input.student_count)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        // Assign recipes if provided
        if let Some(recipe_ids) = input.recipe_ids {
            for recipe_id in recipe_ids {
                let recipe_exists = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM recipes WHERE id = $1",
                )
                .bind(recipe_id)
                .fetch_one(&mut *tx)
                .await?;

                if recipe_exists == 0 {
                    return Err(AppError::NotFound("Recipe".to_string()));
                }

                sqlx::query(
                    "INSERT INTO class_recipes (class_id, recipe_id) VALUES ($1, $2)",
                )
                .bind(class_id)
                .bind(recipe_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        // Return the created class with costed assignments
        self.get_class_detail(class_id).await
    }

    /// Update a class
    pub async fn update_class(
        &self,
        class_id: Uuid,
        input: UpdateClassInput,
    ) -> AppResult<ClassDetail> {
        // Check if class exists
        let existing = sqlx::query_as::<_, ClassRow>(
            "SELECT id, name, start_date, student_count, notes, created_at, updated_at FROM classes WHERE id = $1",
        )
        .bind(class_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Class".to_string()))?;

        // Validate new values if provided
        if let Some(ref name) = input.name {
            validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;
        }

        if let Some(student_count) = input.student_count {
            validate_student_count(student_count).map_err(|msg| AppError::Validation {
                field: "student_count".to_string(),
                message: msg.to_string(),
            })?;
        }

        // Update class
        let name = input.name.unwrap_or(existing.name);
        let start_date = input.start_date.unwrap_or(existing.start_date);
        let student_count = input.student_count.unwrap_or(existing.student_count);
        let notes = input.notes.or(existing.notes);

        sqlx::query(
            r#"
            UPDATE classes
            SET name = $1, start_date = $2, student_count = $3, notes = $4, updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(&name)
        .bind(start_date)
        .bind(student_count)
        .bind(&notes)
        .bind(class_id)
        .execute(&self.db)
        .await?;

        // Return updated class; totals reflect the new headcount immediately
        // because they are derived on read, never stored
        self.get_class_detail(class_id).await
    }

    /// Delete a class
    pub async fn delete_class(&self, class_id: Uuid) -> AppResult<()> {
        // Check if class exists
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM classes WHERE id = $1",
        )
        .bind(class_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Class".to_string()));
        }

        // Check if class has enrolled students
        let student_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE class_id = $1",
        )
        .bind(class_id)
        .fetch_one(&self.db)
        .await?;

        if student_count > 0 {
            return Err(AppError::Validation {
                field: "class_id".to_string(),
                message: format!(
                    "Cannot delete class: {} students are enrolled in it",
                    student_count
                ),
            });
        }

        // Delete class (cascade will delete recipe assignments)
        sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(class_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Assign a recipe to a class
    pub async fn assign_recipe(
        &self,
        class_id: Uuid,
        input: AssignRecipeInput,
    ) -> AppResult<ClassRecipe> {
        // Check if class exists
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM classes WHERE id = $1",
        )
        .bind(class_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Class".to_string()));
        }

        // Check if recipe exists
        let recipe_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM recipes WHERE id = $1",
        )
        .bind(input.recipe_id)
        .fetch_one(&self.db)
        .await?;

        if recipe_exists == 0 {
            return Err(AppError::NotFound("Recipe".to_string()));
        }

        // Check for duplicate assignment
        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM class_recipes WHERE class_id = $1 AND recipe_id = $2",
        )
        .bind(class_id)
        .bind(input.recipe_id)
        .fetch_one(&self.db)
        .await?;

        if duplicate > 0 {
            return Err(AppError::Conflict {
                resource: "recipe".to_string(),
                message: "This recipe is already assigned to the class".to_string(),
            });
        }

        // Insert assignment
        let row = sqlx::query_as::<_, ClassRecipeRow>(
            r#"
            INSERT INTO class_recipes (class_id, recipe_id)
            VALUES ($1, $2)
            RETURNING id, class_id, recipe_id
            "#,
        )
        .bind(class_id)
        .bind(input.recipe_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Remove a recipe assignment from a class
    pub async fn unassign_recipe(&self, class_id: Uuid, recipe_id: Uuid) -> AppResult<()> {
        // Check if class exists
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM classes WHERE id = $1",
        )
        .bind(class_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Class".to_string()));
        }

        // Delete assignment
        let result = sqlx::query(
            "DELETE FROM class_recipes WHERE class_id = $1 AND recipe_id = $2",
        )
        .bind(class_id)
        .bind(recipe_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe assignment".to_string()));
        }

        Ok(())
    }
}
