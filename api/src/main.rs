use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

mod handlers;
mod routes;
mod state;

use common::config::Settings;
use common::db::repositories::ReportRepository;
use common::db::DbPool;
use common::telemetry::init_logging;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Settings::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    init_logging(&config.observability.log_level, config.observability.json_logs)?;

    tracing::info!("Starting report query service");
    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = ?config.database,
        "Configuration loaded"
    );

    // Single pool shared by every request
    let db_pool = DbPool::new(&config.database).await?;
    let store = Arc::new(ReportRepository::new(db_pool.clone()));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let state = AppState::new(store, config);
    let app = routes::create_router(state);

    tracing::info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    tracing::info!("Report query service stopped");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Initiating graceful shutdown");
}
