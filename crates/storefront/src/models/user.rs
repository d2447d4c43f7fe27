//! Shopper account model.

use chrono::{DateTime, Utc};

use gilded_core::{Email, UserId, Username};

/// A registered shopper.
///
/// The password hash is never part of this struct; it stays in the
/// repository layer.
#[derive(Debug, Clone)]
pub struct User {
    /// Database ID.
    pub id: UserId,
    /// Unique login name.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
