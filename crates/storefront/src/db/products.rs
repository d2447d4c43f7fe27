//! Product repository for catalog database operations.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use gilded_core::{Category, Price, ProductId};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

fn map_product(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let price: String = row.try_get("price")?;
    let price: Price = price
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid price in database: {e}")))?;

    let category: String = row.try_get("category")?;
    let category: Category = category.parse().map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid category in database: {e}"))
    })?;

    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price,
        image: row.try_get("image")?,
        category,
    })
}

/// Escape LIKE wildcards so a search for "100%" matches literally.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List the whole catalog in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored product data is invalid.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, description, price, image, category FROM product ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_product).collect()
    }

    /// Case-insensitive substring search on the product name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored product data is invalid.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, description, price, image, category FROM product \
             WHERE name LIKE '%' || ?1 || '%' ESCAPE '\\' \
             ORDER BY id",
        )
        .bind(escape_like(query))
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_product).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored product data is invalid.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, description, price, image, category FROM product WHERE id = ?1",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(map_product).transpose()
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO product (name, description, price, image, category) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             RETURNING id, name, description, price, image, category",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.amount().to_string())
        .bind(&product.image)
        .bind(product.category.as_str())
        .fetch_one(self.pool)
        .await?;

        map_product(&row)
    }

    /// Replace every field of an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: ProductId, product: &NewProduct) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE product SET name = ?1, description = ?2, price = ?3, image = ?4, category = ?5 \
             WHERE id = ?6",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.amount().to_string())
        .bind(&product.image)
        .bind(product.category.as_str())
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = ?1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("ring"), "ring");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
