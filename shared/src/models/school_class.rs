//! Class models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::costing::CostLine;

/// A scheduled class with an enrolled headcount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    /// Enrolled students, the multiplier for per-student recipe costs
    pub student_count: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assignment of a recipe to a class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecipe {
    pub id: Uuid,
    pub class_id: Uuid,
    pub recipe_id: Uuid,
}

/// Class joined with its costed recipe assignments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDetail {
    pub class: SchoolClass,
    pub recipes: Vec<ClassRecipeDetail>,
    pub total_cost: f64,
}

/// Recipe assignment enriched with recipe data for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecipeDetail {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    /// Cost of preparing the recipe for one student
    pub unit_cost: Option<f64>,
    pub total_cost: Option<f64>,
}

impl ClassRecipeDetail {
    pub fn to_cost_line(&self) -> CostLine {
        CostLine {
            reference: self.recipe_id,
            quantity: None,
            unit_cost: self.unit_cost,
            total_cost: self.total_cost,
        }
    }
}
