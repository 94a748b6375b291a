// Report repository: the three read queries behind the HTTP API

use super::queries::report_queries;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{label_executions, ExecutionDate, ExecutionId, ExecutionRecord, ReportFilter, ReportRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tracing::instrument;

/// Read access to report data
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Current time on the database server
    async fn current_time(&self) -> Result<DateTime<Utc>, DatabaseError>;

    /// All rows of one execution, joined with the execution record
    async fn rows_for_execution(&self, id: ExecutionId) -> Result<Vec<ReportRow>, DatabaseError>;

    /// Distinct executions matching the filter, most recent label first
    async fn execution_dates(&self, filter: &ReportFilter) -> Result<Vec<ExecutionDate>, DatabaseError>;
}

/// `ReportStore` backed by the shared PostgreSQL pool
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: DbPool,
}

impl ReportRepository {
    /// Create a new ReportRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for ReportRepository {
    #[instrument(skip(self))]
    async fn current_time(&self) -> Result<DateTime<Utc>, DatabaseError> {
        let now: DateTime<Utc> = sqlx::query_scalar(report_queries::CURRENT_TIME)
            .fetch_one(self.pool.pool())
            .await?;

        tracing::debug!(current_time = %now, "Database time read");
        Ok(now)
    }

    #[instrument(skip(self), fields(execution_id = %id))]
    async fn rows_for_execution(&self, id: ExecutionId) -> Result<Vec<ReportRow>, DatabaseError> {
        let rows: Vec<Json<ReportRow>> = sqlx::query_scalar(report_queries::ROWS_BY_EXECUTION)
            .bind(id.0)
            .fetch_all(self.pool.pool())
            .await?;

        tracing::debug!(row_count = rows.len(), "Report rows fetched");
        Ok(rows.into_iter().map(|Json(row)| row).collect())
    }

    #[instrument(skip(self))]
    async fn execution_dates(&self, filter: &ReportFilter) -> Result<Vec<ExecutionDate>, DatabaseError> {
        let records = sqlx::query_as::<_, ExecutionRecord>(report_queries::EXECUTIONS_BY_FILTER)
            .bind(&filter.entidad)
            .bind(&filter.reporte)
            .bind(&filter.ambiente)
            .fetch_all(self.pool.pool())
            .await?;

        let dates = label_executions(records);
        tracing::debug!(count = dates.len(), "Execution dates fetched");
        Ok(dates)
    }
}
