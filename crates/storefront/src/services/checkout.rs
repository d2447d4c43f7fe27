//! Checkout service.
//!
//! Turns the current cart into an immutable pending order and empties the
//! cart, atomically from the caller's point of view.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use gilded_core::UserId;

use crate::db::RepositoryError;
use crate::db::orders::PendingOrderRepository;
use crate::models::OrderSummary;

/// Checkout service.
pub struct CheckoutService<'a> {
    orders: PendingOrderRepository<'a>,
}

/// Build the order reference from the user id and a second-precision
/// timestamp, e.g. `INV-7-20260807120153`.
#[must_use]
pub fn order_reference(user_id: UserId, at: DateTime<Utc>) -> String {
    format!("INV-{}-{}", user_id.as_i64(), at.format("%Y%m%d%H%M%S"))
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: PendingOrderRepository::new(pool),
        }
    }

    /// Snapshot the user's cart and empty it.
    ///
    /// Returns `None` without side effects when the cart is empty; the
    /// caller redirects back to the cart view in that case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the snapshot transaction fails.
    pub async fn checkout(&self, user_id: UserId) -> Result<Option<OrderSummary>, RepositoryError> {
        let now = Utc::now();
        let order_id = order_reference(user_id, now);
        self.orders.snapshot_cart(user_id, &order_id, now).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_order_reference_format() {
        let at = Utc.with_ymd_and_hms(2026, 8, 7, 12, 1, 53).unwrap();
        assert_eq!(order_reference(UserId::new(7), at), "INV-7-20260807120153");
    }

    #[test]
    fn test_order_reference_second_precision() {
        let a = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let b = a + chrono::Duration::seconds(1);
        assert_ne!(
            order_reference(UserId::new(1), a),
            order_reference(UserId::new(1), b)
        );
    }
}
