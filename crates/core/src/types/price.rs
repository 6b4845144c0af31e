//! Exact price representation using decimal arithmetic.
//!
//! The catalog API sends prices as bare JSON numbers. Parsing them into a
//! [`Decimal`] keeps sums exact (`10 + 0 + -5 + 10.99 == 15.99`), while
//! serialization writes a JSON number back so the wire format is unchanged.
//!
//! Prices carry no validation: zero and negative amounts are valid values.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of minor units (e.g., cents).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Prints the amount without trailing zeros (`30`, `10.99`, `-5`).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_parses_json_numbers() {
        let integer: Price = serde_json::from_str("10").unwrap();
        let decimal: Price = serde_json::from_str("10.99").unwrap();
        let negative: Price = serde_json::from_str("-5").unwrap();

        assert_eq!(integer, Price::from(10));
        assert_eq!(decimal, Price::from_cents(1099));
        assert_eq!(negative, Price::from(-5));
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = serde_json::to_value(Price::from_cents(1099)).unwrap();
        assert!(json.is_number());
    }

    #[test]
    fn test_price_sum_is_exact() {
        let prices = [
            Price::from(10),
            Price::from(0),
            Price::from(-5),
            Price::from_cents(1099),
        ];
        let total: Price = prices.iter().sum();
        assert_eq!(total, Price::from_cents(1599));
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Price = std::iter::empty::<Price>().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_price_display_is_normalized() {
        assert_eq!(Price::from_cents(3000).to_string(), "30");
        assert_eq!(Price::from_cents(1099).to_string(), "10.99");
        assert_eq!(Price::ZERO.to_string(), "0");
        assert_eq!(Price::from(-5).to_string(), "-5");
    }
}
