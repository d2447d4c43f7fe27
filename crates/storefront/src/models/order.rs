//! Checkout snapshot models.
//!
//! An [`OrderSummary`] is an immutable copy of cart-derived values captured
//! at checkout. Its lines are plain values, decoupled from the mutable
//! `Product` and `CartLine` rows, and the same [`OrderLine`] type is consumed
//! by both the HTML and the PDF invoice renderer.

use chrono::{DateTime, Utc};

use gilded_core::Price;

use super::cart::{CartLine, CartTotals};

/// One captured line of a checkout snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// Product name at checkout time.
    pub product_name: String,
    /// Unit price at checkout time.
    pub unit_price: Price,
    /// Purchased quantity.
    pub quantity: i64,
    /// unit price × quantity, computed at checkout.
    pub line_total: Price,
}

/// A checkout snapshot: order reference, totals, and captured lines.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    /// Order reference derived from the user id and checkout timestamp.
    pub order_id: String,
    /// Sum of line subtotals.
    pub total_price: Price,
    /// Sum of quantities.
    pub total_items: i64,
    /// When the snapshot was taken; drives the expiry policy.
    pub created_at: DateTime<Utc>,
    /// Captured lines, in cart order.
    pub lines: Vec<OrderLine>,
}

impl OrderSummary {
    /// Build a snapshot from the current cart lines.
    ///
    /// Totals are computed here, before the caller deletes the lines.
    #[must_use]
    pub fn from_lines(order_id: String, lines: &[CartLine], created_at: DateTime<Utc>) -> Self {
        let totals = CartTotals::of(lines);
        Self {
            order_id,
            total_price: totals.total_price,
            total_items: totals.total_items,
            created_at,
            lines: lines
                .iter()
                .map(|line| OrderLine {
                    product_name: line.product_name.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                    line_total: line.line_total(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gilded_core::{CartLineId, ProductId, UserId};

    fn cart_line(name: &str, unit_price: &str, quantity: i64) -> CartLine {
        CartLine {
            id: CartLineId::new(1),
            user_id: UserId::new(1),
            product_id: ProductId::new(1),
            product_name: name.to_owned(),
            unit_price: unit_price.parse().unwrap(),
            quantity,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_totals_and_line_subtotals() {
        // Product A (100.00 × 2) and Product B (50.00 × 1)
        let lines = vec![cart_line("Product A", "100.00", 2), cart_line("Product B", "50.00", 1)];
        let summary = OrderSummary::from_lines("INV-1-20260807120000".to_owned(), &lines, Utc::now());

        assert_eq!(summary.total_price, "250.00".parse().unwrap());
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].line_total, "200.00".parse().unwrap());
        assert_eq!(summary.lines[1].line_total, "50.00".parse().unwrap());
    }

    #[test]
    fn test_snapshot_copies_values_not_references() {
        let mut lines = vec![cart_line("Old Name", "10.00", 1)];
        let summary = OrderSummary::from_lines("INV-1-x".to_owned(), &lines, Utc::now());

        // Mutating the cart line after the snapshot leaves the summary intact.
        lines[0].product_name = "New Name".to_owned();
        assert_eq!(summary.lines[0].product_name, "Old Name");
    }
}
