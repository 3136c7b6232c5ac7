//! Type-safe price representation using decimal arithmetic.
//!
//! The shop sells in a single currency (Bangladeshi taka), so a price is a bare
//! decimal amount. Floating point is never used for money.

use core::fmt;
use core::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money in taka (BDT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol used for display.
    pub const SYMBOL: &'static str = "৳";

    /// Zero taka.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of taka.
    #[must_use]
    pub fn from_taka(taka: i64) -> Self {
        Self(Decimal::from(taka))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Line total for `quantity` units at this unit price, or `None` if the
    /// total is out of range.
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// `self + rhs`, or `None` if the sum is out of range.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// `self + rhs`, clamped at the representable bounds.
    #[must_use]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::SYMBOL, self.0.normalize())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Saturates instead of overflowing; use [`Price::checked_add`] where an
/// out-of-range total must be rejected.
impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_times_multiplies_exactly() {
        assert_eq!(Price::from_taka(70).checked_times(3), Some(Price::from_taka(210)));
        assert_eq!(
            Price::new(Decimal::new(1999, 2)).checked_times(2),
            Some(Price::new(Decimal::new(3998, 2)))
        );
    }

    #[test]
    fn test_out_of_range_arithmetic_does_not_panic() {
        let max = Price::new(Decimal::MAX);
        assert_eq!(max.checked_times(2), None);
        assert_eq!(max.checked_times(1), Some(max));
        assert_eq!(max.checked_add(Price::from_taka(1)), None);
        assert_eq!(
            Price::from_taka(20).checked_add(Price::from_taka(35)),
            Some(Price::from_taka(55))
        );

        let total: Price = [max, max].into_iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_is_positive() {
        assert!(Price::from_taka(1).is_positive());
        assert!(!Price::ZERO.is_positive());
        assert!(!Price::from_taka(-5).is_positive());
    }

    #[test]
    fn test_sum_and_display() {
        let total: Price = [Price::from_taka(20), Price::from_taka(35)].iter().sum();
        assert_eq!(total, Price::from_taka(55));
        assert_eq!(total.to_string(), "৳55");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_taka(760)).unwrap_or_default();
        assert_eq!(json, "\"760\"");
    }
}
