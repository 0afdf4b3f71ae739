//! Database migration command.
//!
//! Applies `crates/api/migrations/*.sql` in order. Already-applied
//! migrations are skipped, so running this twice is harmless.

use super::{CommandError, connect};

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database cannot be reached or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
