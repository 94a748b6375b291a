use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::state::AppState;

/// Liveness; does not touch the database
#[tracing::instrument]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness: 503 while the report database cannot be reached
#[tracing::instrument(skip(state))]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.current_time().await {
        Ok(_) => (StatusCode::OK, "READY".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Report database not ready");
            (StatusCode::SERVICE_UNAVAILABLE, e.message().to_string())
        }
    }
}
