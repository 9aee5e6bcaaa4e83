use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use diesel::pg::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::db::repositories::DBPool;

/// Migrations under `migrations/`, compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies every pending migration on the given connection and returns the
/// versions that were applied. Already applied migrations are skipped.
pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<Vec<String>> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to run pending migrations: {}", e))?;
    Ok(applied.into_iter().map(|version| version.to_string()).collect())
}

/// Pool flavoured wrapper around [`run_pending_migrations`] that keeps the
/// blocking diesel work off the async runtime.
pub async fn migrate(pool: Arc<DBPool>) -> Result<Vec<String>> {
    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .context("Failed to get DB connection for migrations")?;
        run_pending_migrations(&mut conn)
    })
    .await
    .context("Migration task panicked")??;

    if applied.is_empty() {
        info!("Database schema is up to date.");
    } else {
        info!(versions = ?applied, "Applied database migrations.");
    }
    Ok(applied)
}
