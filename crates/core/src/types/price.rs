//! Monetary amounts in minor currency units.
//!
//! All prices in BellaStore are stored and computed as integer minor-currency
//! units (Colombian pesos have no subdivision in practice, so one unit is one
//! peso). Integer arithmetic keeps order totals exact - there is no rounding
//! anywhere in the money path.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A monetary amount in minor currency units.
///
/// Wraps an `i64` so totals cannot silently overflow `i32` and so prices
/// cannot be confused with quantities or IDs at type level.
///
/// # Example
///
/// ```
/// use bella_store_core::Price;
///
/// let unit = Price::new(89_900);
/// let line = unit.times(2).unwrap();
/// assert_eq!(line, Price::new(179_800));
/// assert_eq!(line.to_string(), "$179.800");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
pub struct Price(i64);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a price from minor currency units.
    #[must_use]
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// The amount in minor currency units.
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Multiply a unit price by a quantity, checking for overflow.
    #[must_use]
    pub fn times(self, quantity: i32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Add two amounts, checking for overflow.
    #[must_use]
    pub fn plus(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Whether this amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Price {
    /// Formats with a dollar sign and dot thousands separators, the way the
    /// store displays Colombian pesos (e.g. `$89.900`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < 0;
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        if negative {
            write!(f, "-${grouped}")
        } else {
            write!(f, "${grouped}")
        }
    }
}

impl From<i64> for Price {
    fn from(minor_units: i64) -> Self {
        Self(minor_units)
    }
}

impl From<Price> for i64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_and_plus_exact() {
        let a = Price::new(10_000).times(2).expect("no overflow");
        let b = Price::new(5_000).times(1).expect("no overflow");
        let subtotal = a.plus(b).expect("no overflow");
        assert_eq!(subtotal, Price::new(25_000));
    }

    #[test]
    fn test_times_overflow() {
        assert!(Price::new(i64::MAX).times(2).is_none());
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Price::new(0).to_string(), "$0");
        assert_eq!(Price::new(999).to_string(), "$999");
        assert_eq!(Price::new(89_900).to_string(), "$89.900");
        assert_eq!(Price::new(1_250_000).to_string(), "$1.250.000");
        assert_eq!(Price::new(-10_000).to_string(), "-$10.000");
    }

    #[test]
    fn test_serde_transparent() {
        let price = Price::new(200_000);
        assert_eq!(serde_json::to_string(&price).expect("serialize"), "200000");
        let back: Price = serde_json::from_str("200000").expect("deserialize");
        assert_eq!(back, price);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::new(100), Price::new(250)].into_iter().sum();
        assert_eq!(total, Price::new(350));
    }
}
