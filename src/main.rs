use anyhow::{Context, Result};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use bookshelf::config::{load_dotenv, Config};
use bookshelf::db::postgres::migrations::migrate;
use bookshelf::db::seed::seed_demo_data;
use bookshelf::router::create_router;

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting bookshelf API server...");

    // --- Configuration ---
    let config = Config::load().context("Failed to load configuration")?;
    info!(env = %config.env, port = config.port, "Configuration loaded.");

    // --- Database Setup ---
    info!("Setting up database connection pool...");
    let database_url = config.database_url()?;
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(config.db_pool_size)
        .build(manager)
        .context("Failed to create database connection pool")?;
    let db_pool = Arc::new(pool);
    info!("Database pool created successfully.");

    migrate(db_pool.clone())
        .await
        .context("Failed to migrate database")?;

    // A failed seed leaves an empty catalogue, the API still works.
    if let Err(e) = seed_demo_data(db_pool.clone()).await {
        error!(error = %e, "Failed to seed demo data.");
    }

    let app = create_router(db_pool);

    // --- Setup Server ---
    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {}", addr))?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Axum server failed")?;

    info!("Application shut down.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C.");
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
                error!(error = %e, "Failed to listen for SIGTERM.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received.");
}
