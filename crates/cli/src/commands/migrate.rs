//! Database migration command.
//!
//! Applies the migrations embedded from `crates/storefront/migrations/`.

use super::CliError;

/// Run pending database migrations.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(())
}
