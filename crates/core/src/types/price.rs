//! Fixed-point price representation using decimal arithmetic.
//!
//! All money in the shop is a [`Price`]: a `rust_decimal::Decimal` amount in
//! a single fixed currency. Arithmetic stays exact to currency precision;
//! floats never enter the picture.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency glyph prefixed to every displayed amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// A price in the shop's fixed currency.
///
/// Displays with the currency glyph and two decimals: `₹1250.00`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// A zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line subtotal: unit price × quantity.
    #[must_use]
    pub fn times(&self, quantity: i64) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{:.2}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Decimal>().map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    #[test]
    fn test_display_two_decimals_with_symbol() {
        assert_eq!(price("100").to_string(), "₹100.00");
        assert_eq!(price("49.5").to_string(), "₹49.50");
        assert_eq!(price("1250.00").to_string(), "₹1250.00");
    }

    #[test]
    fn test_line_subtotal_is_exact() {
        assert_eq!(price("100.00").times(2), price("200.00"));
    }

    #[test]
    fn test_sum_over_lines() {
        let total: Price = [price("100.00").times(2), price("50.00").times(1)]
            .into_iter()
            .sum();
        assert_eq!(total, price("250.00"));
        assert_eq!(total.to_string(), "₹250.00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-price".parse::<Price>().is_err());
    }
}
