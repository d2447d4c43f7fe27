//! Expired pending order cleanup command.
//!
//! The storefront already purges a user's expired snapshot lazily when the
//! invoice is requested; this command sweeps the rest in bulk.

use std::time::Duration;

use chrono::Utc;

use gilded_storefront::db::PendingOrderRepository;

use super::CommandError;

/// Delete pending orders older than `ttl_secs`.
pub async fn run(ttl_secs: u64) -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let purged = PendingOrderRepository::new(&pool)
        .purge_expired(Duration::from_secs(ttl_secs), Utc::now())
        .await?;

    tracing::info!(purged, ttl_secs, "Expired pending orders removed");
    Ok(())
}
