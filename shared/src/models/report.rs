//! Cost report models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a cost report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLine {
    pub reference: Uuid,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit_cost: Option<f64>,
    pub total_cost: f64,
}

/// Cost breakdown for one recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCostReport {
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub lines: Vec<ReportLine>,
    pub grand_total: f64,
}

/// Cost breakdown for one class across its assigned recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassCostReport {
    pub class_id: Uuid,
    pub class_name: String,
    pub start_date: NaiveDate,
    pub student_count: i32,
    pub lines: Vec<ReportLine>,
    pub grand_total: f64,
}

/// Headline counts for the dashboard landing page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub student_count: i64,
    pub class_count: i64,
    pub recipe_count: i64,
    pub ingredient_count: i64,
    pub supplier_count: i64,
}
