// PostgreSQL connection pool shared by every request

use crate::config::DatabaseConfig;
use crate::errors::DatabaseError;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    /// Create the long-lived connection pool
    ///
    /// The pool connects lazily so the service can start while the database
    /// is down; the startup health check logs the failure and every request made
    /// before the database comes back is answered with a server error.
    ///
    /// # Errors
    /// Returns `DatabaseError::ConnectionFailed` if the connection URL is invalid
    #[instrument(skip(config), fields(max_connections = config.max_connections))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!(url = %config.redacted_url(), "Initializing database connection pool");

        let options = PgConnectOptions::from_str(&config.url).map_err(|e| {
            tracing::error!(error = %e, "Invalid database URL");
            DatabaseError::ConnectionFailed(e.to_string())
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_lazy_with(options);

        let db_pool = Self { pool };

        match db_pool.health_check().await {
            Ok(()) => info!(
                max_connections = config.max_connections,
                min_connections = config.min_connections,
                "Database connection pool initialized successfully"
            ),
            Err(e) => tracing::error!(
                error = %e,
                "Database unreachable at startup; requests will fail until it recovers"
            ),
        }

        Ok(db_pool)
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Perform a health check on the database connection
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                DatabaseError::HealthCheckFailed(e.to_string())
            })?;

        tracing::debug!("Database health check passed");
        Ok(())
    }

    /// Close the connection pool gracefully
    #[instrument(skip(self))]
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}
