//! Business logic services.
//!
//! Services sit between route handlers and repositories: authentication,
//! checkout snapshotting, and (feature-gated) PDF invoice rendering.

pub mod auth;
pub mod checkout;
#[cfg(feature = "invoice-pdf")]
pub mod invoice;

pub use auth::{AuthError, AuthService};
pub use checkout::CheckoutService;
