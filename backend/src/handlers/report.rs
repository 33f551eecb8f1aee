//! Reporting handlers for cost breakdowns and data export

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::models::DashboardSummary;

use crate::error::AppResult;
use crate::services::ReportService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Get headline counts for the dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardSummary>> {
    let service = ReportService::new(state.db.clone());
    let summary = service.get_dashboard_summary().await?;
    Ok(Json(summary))
}

/// Get the cost breakdown for one recipe
pub async fn get_recipe_cost_report(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(state.db.clone());
    let report = service.get_recipe_cost_report(recipe_id).await?;

    if query.format.as_deref() == Some("csv") {
        let rows = ReportService::csv_rows(&report.lines);
        let csv = ReportService::export_to_csv(&rows)?;
        Ok((
            [(header::CONTENT_TYPE, "text/csv"), (header::CONTENT_DISPOSITION, "attachment; filename=\"recipe_cost.csv\"")],
            csv,
        ).into_response())
    } else {
        Ok(Json(report).into_response())
    }
}

/// Get the cost breakdown for one class across its assigned recipes
pub async fn get_class_cost_report(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportService::new(state.db.clone());
    let report = service.get_class_cost_report(class_id).await?;

    if query.format.as_deref() == Some("csv") {
        let rows = ReportService::csv_rows(&report.lines);
        let csv = ReportService::export_to_csv(&rows)?;
        Ok((
            [(header::CONTENT_TYPE, "text/csv"), (header::CONTENT_DISPOSITION, "attachment; filename=\"class_cost.csv\"")],
            csv,
        ).into_response())
    } else {
        Ok(Json(report).into_response())
    }
}
