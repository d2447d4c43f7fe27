//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use gilded_core::{Email, UserId, Username};

use super::RepositoryError;
use crate::models::User;

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

fn map_user(row: &SqliteRow) -> Result<User, RepositoryError> {
    let username: String = row.try_get("username")?;
    let username = Username::parse(&username).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
    })?;

    let email: String = row.try_get("email")?;
    let email = Email::parse(&email)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))?;

    Ok(User {
        id: UserId::new(row.try_get("id")?),
        username,
        email,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored account data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT id, username, email, created_at FROM user WHERE id = ?1")
            .bind(id.as_i64())
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Get a user by their login name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored account data is invalid.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let row =
            sqlx::query("SELECT id, username, email, created_at FROM user WHERE username = ?1")
                .bind(username.as_str())
                .fetch_optional(self.pool)
                .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Create a new user with username, email and password hash.
    ///
    /// The user row and the password row are written in one transaction,
    /// so an account never exists without a credential.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email already
    /// exists (the message names the violated column).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        username: &Username,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "INSERT INTO user (username, email, created_at) VALUES (?1, ?2, ?3) \
             RETURNING id, username, email, created_at",
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(db_err.message().to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let user = map_user(&row)?;

        sqlx::query("INSERT INTO user_password (user_id, password_hash) VALUES (?1, ?2)")
            .bind(user.id.as_i64())
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Get a user and their password hash by login name.
    ///
    /// Returns `None` if the user doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query(
            "SELECT u.id, u.username, u.email, u.created_at, p.password_hash \
             FROM user u \
             JOIN user_password p ON u.id = p.user_id \
             WHERE u.username = ?1",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = map_user(&row)?;
        let password_hash: String = row.try_get("password_hash")?;

        Ok(Some((user, password_hash)))
    }
}
