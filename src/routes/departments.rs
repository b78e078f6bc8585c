// src/routes/departments.rs

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::ApiError;
use crate::{
    models::{Department, Message, MetricUpdates, SummaryResponse},
    AppState,
};

/// GET /api/departments
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Department>>, ApiError> {
    let rows = state.store.list_departments().await?;
    Ok(Json(rows))
}

/// GET /api/departments/summary
///
/// Departments come from the metrics table, so one with no metrics is absent
/// from both `data` and `weights`.
pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let departments = state.store.metrics_by_department().await?;
    Ok(Json(SummaryResponse::build(&departments)))
}

/// GET /api/departments/:dept_name
pub async fn get_department(
    State(state): State<AppState>,
    Path(dept_name): Path<String>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, ApiError> {
    let values = state.store.department_values(&dept_name).await?;
    if values.is_empty() {
        return Err(ApiError::NotFound("Department not found"));
    }
    Ok(Json(values))
}

/// PUT /api/departments/:dept_name
pub async fn update_department(
    State(state): State<AppState>,
    Path(dept_name): Path<String>,
    body: Result<Json<MetricUpdates>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(updates) = body?;
    let touched = state.store.update_metrics(&dept_name, &updates).await?;
    tracing::info!(dept = %dept_name, requested = updates.len(), touched, "metrics updated");
    Ok(Json(Message { message: "Department metrics updated successfully." }))
}
