//! Cart repository for database operations.
//!
//! Every mutation is scoped to the owning user via `WHERE ... AND user_id`;
//! touching another user's line surfaces as `NotFound`. Lines are read
//! joined with the product's current name and price.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use gilded_core::{CartLineId, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::CartLine;

const LINE_COLUMNS: &str = "cl.id, cl.user_id, cl.product_id, p.name AS product_name, \
                            p.price AS unit_price, cl.quantity, cl.added_at";

/// Repository for cart line operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

pub(super) fn map_line(row: &SqliteRow) -> Result<CartLine, RepositoryError> {
    let unit_price: String = row.try_get("unit_price")?;
    let unit_price: Price = unit_price
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid price in database: {e}")))?;

    Ok(CartLine {
        id: CartLineId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        product_id: ProductId::new(row.try_get("product_id")?),
        product_name: row.try_get("product_name")?,
        unit_price,
        quantity: row.try_get("quantity")?,
        added_at: row.try_get::<DateTime<Utc>, _>("added_at")?,
    })
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All of a user's cart lines, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {LINE_COLUMNS} FROM cart_line cl \
             JOIN product p ON p.id = cl.product_id \
             WHERE cl.user_id = ?1 \
             ORDER BY cl.added_at, cl.id"
        ))
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_line).collect()
    }

    /// Get one of the user's lines by ID.
    ///
    /// Another user's line is `None`, indistinguishable from a missing one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn get_line(
        &self,
        user_id: UserId,
        line_id: CartLineId,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {LINE_COLUMNS} FROM cart_line cl \
             JOIN product p ON p.id = cl.product_id \
             WHERE cl.id = ?1 AND cl.user_id = ?2"
        ))
        .bind(line_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(map_line).transpose()
    }

    /// Add a product to the cart: quantity 1 if absent, else increment by 1.
    ///
    /// The caller is responsible for verifying that the product exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails (including a
    /// foreign key violation for an unknown product).
    pub async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_line (user_id, product_id, quantity, added_at) \
             VALUES (?1, ?2, 1, ?3) \
             ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = quantity + 1",
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Increment a line's quantity by 1.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn increment(
        &self,
        user_id: UserId,
        line_id: CartLineId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_line SET quantity = quantity + 1 WHERE id = ?1 AND user_id = ?2",
        )
        .bind(line_id.as_i64())
        .bind(user_id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Decrement a line's quantity by 1, removing the line when the
    /// quantity would fall to or below zero.
    ///
    /// Runs in a transaction so the read-then-write pair cannot interleave
    /// with another mutation of the same line.
    ///
    /// # Returns
    ///
    /// `true` if the line was removed, `false` if it was decremented.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn decrement_or_remove(
        &self,
        user_id: UserId,
        line_id: CartLineId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT quantity FROM cart_line WHERE id = ?1 AND user_id = ?2")
            .bind(line_id.as_i64())
            .bind(user_id.as_i64())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };
        let quantity: i64 = row.try_get("quantity")?;

        let removed = if quantity <= 1 {
            sqlx::query("DELETE FROM cart_line WHERE id = ?1 AND user_id = ?2")
                .bind(line_id.as_i64())
                .bind(user_id.as_i64())
                .execute(&mut *tx)
                .await?;
            true
        } else {
            sqlx::query(
                "UPDATE cart_line SET quantity = quantity - 1 WHERE id = ?1 AND user_id = ?2",
            )
            .bind(line_id.as_i64())
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await?;
            false
        };

        tx.commit().await?;

        Ok(removed)
    }

    /// Remove a line unconditionally.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove(
        &self,
        user_id: UserId,
        line_id: CartLineId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_line WHERE id = ?1 AND user_id = ?2")
            .bind(line_id.as_i64())
            .bind(user_id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete all of a user's cart lines. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_line WHERE user_id = ?1")
            .bind(user_id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
