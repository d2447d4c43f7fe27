//! Checkout route handler.

use axum::{extract::State, response::Redirect};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::CheckoutService;
use crate::state::AppState;

/// Snapshot the cart into a pending order and empty the cart.
///
/// An empty cart is a no-op: the browser goes back to the cart view and
/// nothing is written. Otherwise the snapshot and the cart clearing commit
/// together, and the browser lands on the invoice.
#[instrument(skip(state, user))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Redirect> {
    match CheckoutService::new(state.pool()).checkout(user.id).await? {
        Some(order) => {
            tracing::info!(
                user_id = %user.id,
                order_id = %order.order_id,
                total_items = order.total_items,
                "Checkout complete"
            );
            Ok(Redirect::to("/invoice"))
        }
        None => Ok(Redirect::to("/cart")),
    }
}
