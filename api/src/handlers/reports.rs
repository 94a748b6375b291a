use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::handlers::ApiError;
use crate::state::AppState;
use common::models::{CurrentTime, ExecutionDate, ExecutionId, ReportFilter, ReportRow};

/// Query parameters of the execution date lookup
#[derive(Debug, Deserialize)]
pub struct ReportDatesQuery {
    pub entidad: Option<String>,
    pub reporte: Option<String>,
    pub ambiente: Option<String>,
}

/// Current time of the report database
#[tracing::instrument(skip(state))]
pub async fn current_time(State(state): State<AppState>) -> Result<Json<Vec<CurrentTime>>, ApiError> {
    tracing::info!("Handling request: GET /api/reports");

    let now = state.store.current_time().await.map_err(|e| {
        tracing::error!(error = %e, "Database time query failed");
        ApiError::from(e)
    })?;

    Ok(Json(vec![CurrentTime { current_time: now }]))
}

/// All rows of one execution
///
/// The path value may carry a date suffix (`"007 2024-05-01"`); only its
/// leading integer is used.
#[tracing::instrument(skip(state))]
pub async fn report_data(
    State(state): State<AppState>,
    Path(raw_execution_id): Path<String>,
) -> Result<Json<Vec<ReportRow>>, ApiError> {
    let execution_id = ExecutionId::parse_leading(&raw_execution_id).map_err(|e| {
        tracing::warn!(raw_execution_id = %raw_execution_id, "Rejected execution id");
        ApiError::from(e)
    })?;

    tracing::info!(execution_id = %execution_id, "Handling request: GET /api/report-data");

    let rows = state
        .store
        .rows_for_execution(execution_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, execution_id = %execution_id, "Failed to fetch report data");
            ApiError::from(e)
        })?;

    tracing::info!(execution_id = %execution_id, row_count = rows.len(), "Report data fetched");
    Ok(Json(rows))
}

/// Distinct executions matching entity, report name and environment
#[tracing::instrument(skip(state))]
pub async fn report_dates(
    State(state): State<AppState>,
    Query(query): Query<ReportDatesQuery>,
) -> Result<Json<Vec<ExecutionDate>>, ApiError> {
    let filter = ReportFilter::from_parts(query.entidad, query.reporte, query.ambiente).map_err(|e| {
        tracing::warn!("Rejected report dates lookup with missing parameters");
        ApiError::from(e)
    })?;

    tracing::info!(
        entidad = %filter.entidad,
        reporte = %filter.reporte,
        ambiente = %filter.ambiente,
        "Handling request: GET /api/report-dates"
    );

    let dates = state.store.execution_dates(&filter).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch report dates");
        ApiError::from(e)
    })?;

    tracing::info!(count = dates.len(), "Report dates fetched");
    Ok(Json(dates))
}
