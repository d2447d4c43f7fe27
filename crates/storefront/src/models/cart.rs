//! Cart line model.

use chrono::{DateTime, Utc};

use gilded_core::{CartLineId, Price, ProductId, UserId};

/// One (user, product, quantity) row, read joined with the product's
/// current name and price.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// Database ID.
    pub id: CartLineId,
    /// Owning user. Mutations are always scoped to this user.
    pub user_id: UserId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Product name at read time.
    pub product_name: String,
    /// Product unit price at read time.
    pub unit_price: Price,
    /// Always positive; a decrement that would reach zero removes the row.
    pub quantity: i64,
    /// When the line was first added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Line subtotal: unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Aggregate totals over a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of line subtotals.
    pub total_price: Price,
    /// Sum of quantities.
    pub total_items: i64,
}

impl CartTotals {
    /// Compute totals over the given lines.
    #[must_use]
    pub fn of(lines: &[CartLine]) -> Self {
        Self {
            total_price: lines.iter().map(CartLine::line_total).sum(),
            total_items: lines.iter().map(|line| line.quantity).sum(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(name: &str, unit_price: &str, quantity: i64) -> CartLine {
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
    fn test_line_total() {
        assert_eq!(line("Gold Ring", "100.00", 2).line_total(), "200.00".parse().unwrap());
    }

    #[test]
    fn test_totals_over_lines() {
        let lines = vec![line("A", "100.00", 2), line("B", "50.00", 1)];
        let totals = CartTotals::of(&lines);
        assert_eq!(totals.total_price, "250.00".parse().unwrap());
        assert_eq!(totals.total_items, 3);
    }

    #[test]
    fn test_totals_of_empty_cart() {
        let totals = CartTotals::of(&[]);
        assert_eq!(totals.total_price, Price::zero());
        assert_eq!(totals.total_items, 0);
    }
}
