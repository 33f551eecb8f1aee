//! Recipe models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::costing::CostLine;
use crate::units::Unit;

/// A recipe taught in classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Portions one preparation yields
    pub servings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One ingredient line of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    /// Amount used, measured in the ingredient's usage unit
    pub quantity: f64,
}

/// Recipe joined with its costed ingredient lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredientDetail>,
    pub total_cost: f64,
}

/// Ingredient line enriched with ingredient data for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientDetail {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub quantity: f64,
    pub usage_unit: Unit,
    pub unit_cost: Option<f64>,
    pub total_cost: Option<f64>,
}

impl RecipeIngredientDetail {
    pub fn to_cost_line(&self) -> CostLine {
        CostLine {
            reference: self.ingredient_id,
            quantity: Some(self.quantity),
            unit_cost: self.unit_cost,
            total_cost: self.total_cost,
        }
    }
}
