use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use super::error::FinanceError;

/// An exact monetary amount, always held at two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Integer cents for persistence. `None` when the amount does not fit in an `i64`.
    pub fn to_cents(self) -> Option<i64> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.round().to_i64())
    }

    /// Rounds half-to-even and pins the scale at 2, so `40000` becomes `40000.00`.
    pub fn from_decimal(decimal: Decimal) -> Self {
        let mut rounded = decimal.round_dp(2);
        rounded.rescale(2);
        Money(rounded)
    }

    /// Rejects amounts too large to persist as integer cents.
    pub fn require_storable(self, field: &str) -> Result<Self, FinanceError> {
        match self.to_cents() {
            Some(_) => Ok(self),
            None => Err(FinanceError::Validation(format!("{field} {self} is too large"))),
        }
    }

    pub fn zero() -> Self {
        Money(Decimal::new(0, 2))
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(decimal: Decimal) -> Self {
        Money::from_decimal(decimal)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |a, b| a + b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cents_round_trip() {
        let m = Money::from_cents(123_456);
        assert_eq!(m.to_string(), "1234.56");
        assert_eq!(m.to_cents(), Some(123_456));
    }

    #[test]
    fn from_decimal_rounds_to_two_places() {
        let m = Money::from_decimal(Decimal::from_str("10.005").unwrap());
        assert_eq!(m.to_cents(), Some(1000));
        let m = Money::from_decimal(Decimal::from_str("10.015").unwrap());
        assert_eq!(m.to_cents(), Some(1002));
    }

    #[test]
    fn no_float_drift_in_sums() {
        let tenth = Money::from_decimal(Decimal::from_str("0.1").unwrap());
        let total: Money = (0..10).map(|_| tenth).sum();
        assert_eq!(total, Money::from_cents(100));
    }

    #[test]
    fn sign_checks() {
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::zero().is_negative());
        assert!(!Money::zero().is_positive());
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(100_000)).unwrap();
        assert_eq!(json, "\"1000.00\"");
        let back: Money = serde_json::from_str("1000").unwrap();
        assert_eq!(back, Money::from_cents(100_000));
        let back: Money = serde_json::from_str("\"12.345\"").unwrap();
        assert_eq!(back.to_cents(), Some(1234));
    }

    #[test]
    fn whole_amounts_serialize_with_two_places() {
        let json = serde_json::to_string(&Money::from_decimal(Decimal::from(40000))).unwrap();
        assert_eq!(json, "\"40000.00\"");

        let parsed: Money = serde_json::from_str("\"40000\"").unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"40000.00\"");
        assert_eq!(parsed, Money::from_cents(4_000_000));

        let one_place: Money = serde_json::from_str("\"5.5\"").unwrap();
        assert_eq!(one_place.to_string(), "5.50");
        assert_eq!(serde_json::to_string(&one_place).unwrap(), "\"5.50\"");
    }

    #[test]
    fn oversized_amount_has_no_cents() {
        let huge = Money::from_decimal(Decimal::MAX);
        assert_eq!(huge.to_cents(), None);
        assert!(matches!(
            huge.require_storable("amount"),
            Err(FinanceError::Validation(_))
        ));
        assert!(Money::from_cents(i64::MAX).require_storable("amount").is_ok());
    }
}
