//! Database operations for the storefront `SQLite` database.
//!
//! ## Tables
//!
//! - `user` / `user_password` - Shopper authentication
//! - `product` - Administrator-maintained catalog
//! - `cart_line` - One row per (user, product) pair in a cart
//! - `pending_order` / `pending_order_line` - Checkout snapshots awaiting
//!   invoice display, purged after a configurable TTL
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! Money columns are TEXT holding decimal strings; repositories parse them
//! into `Price` and report a failed parse as [`RepositoryError::DataCorruption`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p gilded-cli -- migrate
//! ```

pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use cart::CartRepository;
pub use orders::PendingOrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Embedded migrations for the storefront database.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
