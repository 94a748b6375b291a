// Error handling framework

use thiserror::Error;

/// Validation errors for caller-supplied input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid Execution ID format.")]
    InvalidExecutionId(String),

    #[error("Missing required query parameters: entidad, reporte, ambiente")]
    MissingFilter,
}

/// Database-specific errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl DatabaseError {
    /// The driver's message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            DatabaseError::ConnectionFailed(msg)
            | DatabaseError::HealthCheckFailed(msg)
            | DatabaseError::QueryFailed(msg)
            | DatabaseError::NotFound(msg) => msg,
        }
    }
}

/// Errors raised while writing an export file
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: the dataset is empty")]
    EmptyDataset,

    #[error("CSV export failed: {0}")]
    Csv(String),

    #[error("Excel export failed: {0}")]
    Excel(String),

    #[error("PDF export failed: {0}")]
    Pdf(String),

    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => DatabaseError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => DatabaseError::ConnectionFailed(err.to_string()),
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Excel(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_match_wire_text() {
        assert_eq!(
            ValidationError::InvalidExecutionId("abc".to_string()).to_string(),
            "Invalid Execution ID format."
        );
        assert_eq!(
            ValidationError::MissingFilter.to_string(),
            "Missing required query parameters: entidad, reporte, ambiente"
        );
    }

    #[test]
    fn test_database_error_message_strips_prefix() {
        let err = DatabaseError::QueryFailed("relation \"datos_reportes\" does not exist".to_string());
        assert!(err.to_string().starts_with("Query execution failed"));
        assert_eq!(err.message(), "relation \"datos_reportes\" does not exist");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DatabaseError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[test]
    fn test_pool_timeout_maps_to_connection_failed() {
        let err: DatabaseError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DatabaseError::ConnectionFailed(_)));
    }
}
