//! Session-related types.
//!
//! Types stored in the session for authentication state. Since the pending
//! order moved into its own table, the session carries identity only.

use serde::{Deserialize, Serialize};

use gilded_core::{UserId, Username};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's login name, shown in the header and on invoices.
    pub username: Username,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
