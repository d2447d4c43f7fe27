//! Middleware: authentication extractors and session configuration.

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use session::{create_session_layer, create_session_store};
