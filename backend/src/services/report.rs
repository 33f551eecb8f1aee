//! Reporting service for cost breakdowns and data export

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::costing::{line_contribution, order_total, reprice_lines, scaled_cost, CostLine};
use shared::models::{ClassCostReport, DashboardSummary, RecipeCostReport, ReportLine};

use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// Ingredient line row for recipe reports
#[derive(Debug, sqlx::FromRow)]
struct RecipeReportLineRow {
    ingredient_id: Uuid,
    ingredient_name: String,
    quantity: f64,
    usage_cost: Option<f64>,
}

/// Recipe assignment row for class reports
#[derive(Debug, sqlx::FromRow)]
struct ClassReportRecipeRow {
    recipe_id: Uuid,
    recipe_name: String,
}

/// Ingredient line row for the recipes of one class
#[derive(Debug, sqlx::FromRow)]
struct ClassReportLineRow {
    recipe_id: Uuid,
    quantity: f64,
    usage_cost: Option<f64>,
}

/// Class header row for class reports
#[derive(Debug, sqlx::FromRow)]
struct ClassHeaderRow {
    id: Uuid,
    name: String,
    start_date: chrono::NaiveDate,
    student_count: i32,
}

/// CSV presentation row; money columns rounded to 2 decimal places while
/// the stored values stay full-precision
#[derive(Debug, Serialize)]
pub struct CsvReportRow {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit_cost: Option<Decimal>,
    pub total_cost: Decimal,
}

impl CsvReportRow {
    fn from_line(line: &ReportLine) -> Self {
        Self {
            name: line.name.clone(),
            quantity: line.quantity,
            unit_cost: line.unit_cost.map(money),
            total_cost: money(line.total_cost),
        }
    }
}

/// Round a stored amount to a 2-decimal money figure for display
fn money(value: f64) -> Decimal {
    let mut amount = Decimal::from_f64_retain(value).unwrap_or_default().round_dp(2);
    amount.rescale(2);
    amount
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get the cost breakdown for one recipe
    pub async fn get_recipe_cost_report(&self, recipe_id: Uuid) -> AppResult<RecipeCostReport> {
        let recipe_name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM recipes WHERE id = $1",
        )
        .bind(recipe_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        let rows = sqlx::query_as::<_, RecipeReportLineRow>(
            r#"
            SELECT ri.ingredient_id, i.name AS ingredient_name, ri.quantity, i.usage_cost
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY i.name ASC
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.db)
        .await?;

        let mut lines = Vec::with_capacity(rows.len());
        let mut cost_lines = Vec::with_capacity(rows.len());
        for row in rows {
            let total_cost = row
                .usage_cost
                .filter(|cost| cost.is_finite())
                .map(|cost| scaled_cost(cost, Some(row.quantity)));

            let cost_line = CostLine {
                reference: row.ingredient_id,
                quantity: Some(row.quantity),
                unit_cost: row.usage_cost,
                total_cost,
            };

            lines.push(ReportLine {
                reference: row.ingredient_id,
                name: row.ingredient_name,
                quantity: Some(row.quantity),
                unit_cost: row.usage_cost,
                total_cost: line_contribution(&cost_line, None),
            });
            cost_lines.push(cost_line);
        }

        let grand_total = order_total(&cost_lines, None);

        Ok(RecipeCostReport {
            recipe_id,
            recipe_name,
            lines,
            grand_total,
        })
    }

    /// Get the cost breakdown for one class across its assigned recipes
    pub async fn get_class_cost_report(&self, class_id: Uuid) -> AppResult<ClassCostReport> {
        let class = sqlx::query_as::<_, ClassHeaderRow>(
            "SELECT id, name, start_date, student_count FROM classes WHERE id = $1",
        )
        .bind(class_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Class".to_string()))?;

        let assigned = sqlx::query_as::<_, ClassReportRecipeRow>(
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

        let line_rows = sqlx::query_as::<_, ClassReportLineRow>(
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

        // Per-student unit cost of each recipe from its ingredient lines
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

        let multiplier = Some(class.student_count as f64);

        let mut cost_lines = Vec::with_capacity(assigned.len());
        for assignment in &assigned {
            let unit_cost = lines_by_recipe
                .get(&assignment.recipe_id)
                .map(|lines| order_total(lines, None))
                .unwrap_or(0.0);

            cost_lines.push(CostLine {
                reference: assignment.recipe_id,
                quantity: None,
                unit_cost: Some(unit_cost),
                total_cost: None,
            });
        }

        reprice_lines(&mut cost_lines, multiplier);

        let lines = assigned
            .iter()
            .zip(&cost_lines)
            .map(|(assignment, line)| ReportLine {
                reference: assignment.recipe_id,
                name: assignment.recipe_name.clone(),
                quantity: Some(class.student_count as f64),
                unit_cost: line.unit_cost,
                total_cost: line_contribution(line, multiplier),
            })
            .collect();

        let grand_total = order_total(&cost_lines, multiplier);

        Ok(ClassCostReport {
            class_id: class.id,
            class_name: class.name,
            start_date: class.start_date,
            student_count: class.student_count,
            lines,
            grand_total,
        })
    }

    /// Get headline counts for the dashboard landing page
    pub async fn get_dashboard_summary(&self) -> AppResult<DashboardSummary> {
        let student_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM students WHERE status = 'active'",
        )
        .fetch_one(&self.db)
        .await?;

        let class_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classes")
            .fetch_one(&self.db)
            .await?;

        let recipe_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.db)
            .await?;

        let ingredient_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredients")
            .fetch_one(&self.db)
            .await?;

        let supplier_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.db)
            .await?;

        Ok(DashboardSummary {
            student_count,
            class_count,
            recipe_count,
            ingredient_count,
            supplier_count,
        })
    }

    /// Build CSV presentation rows for a set of report lines
    pub fn csv_rows(lines: &[ReportLine]) -> Vec<CsvReportRow> {
        lines.iter().map(CsvReportRow::from_line).collect()
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_rounds_to_two_decimals() {
        assert_eq!(money(2.345).to_string(), "2.35");
        assert_eq!(money(44.0).to_string(), "44.00");
        assert_eq!(money(0.005).to_string(), "0.01");
    }

    #[test]
    fn test_money_survives_non_finite_input() {
        assert_eq!(money(f64::NAN), Decimal::ZERO);
        assert_eq!(money(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_csv_export_includes_header_and_rows() {
        let rows = vec![
            CsvReportRow {
                name: "Flour".to_string(),
                quantity: Some(200.0),
                unit_cost: Some(money(0.002)),
                total_cost: money(0.4),
            },
            CsvReportRow {
                name: "Butter".to_string(),
                quantity: Some(3.0),
                unit_cost: Some(money(1.5)),
                total_cost: money(4.5),
            },
        ];

        let csv = ReportService::export_to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,quantity,unit_cost,total_cost"));
        assert_eq!(lines.next(), Some("Flour,200.0,0.00,0.40"));
        assert_eq!(lines.next(), Some("Butter,3.0,1.50,4.50"));
    }
}
