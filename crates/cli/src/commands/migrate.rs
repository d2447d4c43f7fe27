//! Database migration command.
//!
//! Applies the embedded storefront migrations, then makes sure the session
//! store's table exists as well.

use super::CommandError;

/// Run storefront database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running storefront migrations...");
    gilded_storefront::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrating session store...");
    gilded_storefront::middleware::session::create_session_store(&pool)
        .migrate()
        .await?;

    tracing::info!("Migrations complete");
    Ok(())
}
