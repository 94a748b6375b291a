pub mod health;
pub mod reports;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::errors::{DatabaseError, ValidationError};

/// Handler error, sent to the client as a plain-text body
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad or missing request input (400)
    #[error("{0}")]
    ClientInput(String),

    /// Database unreachable or query failure (500); carries the driver message verbatim
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ClientInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::ClientInput(err.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Upstream(err.message().to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, self.to_string()).into_response()
    }
}
