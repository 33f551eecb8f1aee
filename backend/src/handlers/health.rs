//! Health and readiness reporting

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub database: &'static str,
}

/// Versioned health endpoint; reports whether the database answers a ping.
/// The dashboard shows this on its status page, load balancers use the
/// bare `/health` route in `main.rs` instead.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "unreachable",
    };

    Json(HealthReport {
        status: if database == "connected" { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database,
    })
}
