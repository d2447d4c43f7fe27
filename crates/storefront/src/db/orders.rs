//! Pending order repository.
//!
//! A pending order is the checkout snapshot: an explicit short-lived record
//! keyed by user (one per user, the latest checkout overwrites) instead of
//! ambient session state. Records carry their creation time and are treated
//! as absent once older than the configured TTL; expired rows are purged
//! lazily on read and in bulk via the CLI.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use gilded_core::{Price, UserId};

use super::RepositoryError;
use crate::models::{OrderLine, OrderSummary};

/// Repository for checkout snapshots.
pub struct PendingOrderRepository<'a> {
    pool: &'a SqlitePool,
}

fn parse_price(raw: &str) -> Result<Price, RepositoryError> {
    raw.parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid price in database: {e}")))
}

fn map_order_line(row: &SqliteRow) -> Result<OrderLine, RepositoryError> {
    Ok(OrderLine {
        product_name: row.try_get("product_name")?,
        unit_price: parse_price(&row.try_get::<String, _>("unit_price")?)?,
        quantity: row.try_get("quantity")?,
        line_total: parse_price(&row.try_get::<String, _>("line_total")?)?,
    })
}

/// Whether a snapshot created at `created_at` has outlived `ttl` at `now`.
fn is_expired(created_at: DateTime<Utc>, ttl: Duration, now: DateTime<Utc>) -> bool {
    chrono::Duration::from_std(ttl).is_ok_and(|ttl| created_at + ttl <= now)
}

impl<'a> PendingOrderRepository<'a> {
    /// Create a new pending order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Snapshot the user's cart into a pending order and empty the cart.
    ///
    /// Everything happens in one transaction: read the lines, compute the
    /// totals, replace any prior pending order, write the line snapshots,
    /// delete the cart lines. Concurrent mutations of the same cart
    /// serialize on the store's write transaction.
    ///
    /// Returns `None` without side effects when the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn snapshot_cart(
        &self,
        user_id: UserId,
        order_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OrderSummary>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "SELECT cl.id, cl.user_id, cl.product_id, p.name AS product_name, \
                    p.price AS unit_price, cl.quantity, cl.added_at \
             FROM cart_line cl \
             JOIN product p ON p.id = cl.product_id \
             WHERE cl.user_id = ?1 \
             ORDER BY cl.added_at, cl.id",
        )
        .bind(user_id.as_i64())
        .fetch_all(&mut *tx)
        .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let lines = rows
            .iter()
            .map(super::cart::map_line)
            .collect::<Result<Vec<_>, _>>()?;

        let summary = OrderSummary::from_lines(order_id.to_owned(), &lines, now);

        // Latest checkout wins; cascade clears the old line snapshots.
        sqlx::query("DELETE FROM pending_order WHERE user_id = ?1")
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO pending_order (user_id, order_id, total_price, total_items, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(user_id.as_i64())
        .bind(&summary.order_id)
        .bind(summary.total_price.amount().to_string())
        .bind(summary.total_items)
        .bind(summary.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, line) in summary.lines.iter().enumerate() {
            sqlx::query(
                "INSERT INTO pending_order_line \
                 (user_id, position, product_name, unit_price, quantity, line_total) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(user_id.as_i64())
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .bind(&line.product_name)
            .bind(line.unit_price.amount().to_string())
            .bind(line.quantity)
            .bind(line.line_total.amount().to_string())
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_line WHERE user_id = ?1")
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(summary))
    }

    /// Get the user's pending order, if one exists and hasn't expired.
    ///
    /// An expired record is deleted on the way out and reported as absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_active(
        &self,
        user_id: UserId,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<OrderSummary>, RepositoryError> {
        let row = sqlx::query(
            "SELECT order_id, total_price, total_items, created_at \
             FROM pending_order WHERE user_id = ?1",
        )
        .bind(user_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        if is_expired(created_at, ttl, now) {
            sqlx::query("DELETE FROM pending_order WHERE user_id = ?1")
                .bind(user_id.as_i64())
                .execute(self.pool)
                .await?;
            return Ok(None);
        }

        let line_rows = sqlx::query(
            "SELECT product_name, unit_price, quantity, line_total \
             FROM pending_order_line WHERE user_id = ?1 ORDER BY position",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        let lines = line_rows
            .iter()
            .map(map_order_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(OrderSummary {
            order_id: row.try_get("order_id")?,
            total_price: parse_price(&row.try_get::<String, _>("total_price")?)?,
            total_items: row.try_get("total_items")?,
            created_at,
            lines,
        }))
    }

    /// Delete every pending order older than the TTL. Returns the number
    /// of orders removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn purge_expired(
        &self,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let rows = sqlx::query("SELECT user_id, created_at FROM pending_order")
            .fetch_all(self.pool)
            .await?;

        let mut purged = 0u64;
        for row in rows {
            let created_at: DateTime<Utc> = row.try_get("created_at")?;
            if is_expired(created_at, ttl, now) {
                let user_id: i64 = row.try_get("user_id")?;
                sqlx::query("DELETE FROM pending_order WHERE user_id = ?1")
                    .bind(user_id)
                    .execute(self.pool)
                    .await?;
                purged += 1;
            }
        }

        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        let ttl = Duration::from_secs(3600);

        assert!(!is_expired(now, ttl, now));
        assert!(!is_expired(now - chrono::Duration::minutes(59), ttl, now));
        assert!(is_expired(now - chrono::Duration::hours(1), ttl, now));
        assert!(is_expired(now - chrono::Duration::days(2), ttl, now));
    }
}
