//! Money type for representing currency amounts
//!
//! Wraps an exact `rust_decimal::Decimal` so that shares such as 100 / 3 are
//! carried without rounding. Rounding happens only when an amount is
//! formatted for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Represents a currency-agnostic monetary amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money amount from an exact decimal
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use shareledger::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the exact decimal value
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Check if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Divide evenly across `parts` recipients without rounding.
    ///
    /// Returns `None` when `parts` is zero, so callers cannot produce a
    /// non-numeric share.
    pub fn split_evenly(&self, parts: usize) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        self.0.checked_div(Decimal::from(parts as u64)).map(Self)
    }

    /// Addition that returns `None` instead of overflowing
    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Sum that returns `None` if any partial total overflows
    pub fn checked_sum<'a>(amounts: impl IntoIterator<Item = &'a Money>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |total, amount| total.checked_add(*amount))
    }

    /// Value rounded to whole cents (display precision)
    pub fn rounded(&self) -> Self {
        Self(self.0.round_dp(2))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10", "1,250.00"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };

        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let digits: String = rest.chars().filter(|c| *c != ',').collect();

        if digits.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value = Decimal::from_str(&digits)
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol, rounded to cents
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let rounded = self.0.round_dp(2);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{}{:.2}", symbol, rounded.abs())
        } else {
            format!("{}{:.2}", symbol, rounded.abs())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.amount(), dec!(10.50));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-$10.50");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::new(dec!(33.333333)).to_string(), "$33.33");
    }

    #[test]
    fn test_tiny_negative_displays_as_zero() {
        assert_eq!(Money::new(dec!(-0.001)).to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).amount(), dec!(15));
        assert_eq!((a - b).amount(), dec!(5));
        assert_eq!((-a).amount(), dec!(-10));
    }

    #[test]
    fn test_checked_add_reports_overflow() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_add(Money::from_cents(100)), None);
        assert_eq!(
            Money::from_cents(100).checked_add(Money::from_cents(250)),
            Some(Money::from_cents(350))
        );

        assert_eq!(Money::checked_sum(&[max, max]), None);
        assert_eq!(
            Money::checked_sum(&[Money::from_cents(1), Money::from_cents(2)]),
            Some(Money::from_cents(3))
        );
        assert_eq!(Money::checked_sum(&[]), Some(Money::zero()));
    }

    #[test]
    fn test_split_evenly_is_exact() {
        let total = Money::new(dec!(75));
        assert_eq!(total.split_evenly(3), Some(Money::new(dec!(25))));

        let third = Money::new(dec!(100)).split_evenly(3).unwrap();
        assert_eq!(third.to_string(), "$33.33");
        let drift = (Money::new(dec!(100)) - (third + third + third)).abs();
        assert!(drift.amount() < dec!(0.000000000001));
    }

    #[test]
    fn test_split_evenly_zero_parts() {
        assert_eq!(Money::new(dec!(75)).split_evenly(0), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().amount(), dec!(10.50));
        assert_eq!(Money::parse("$10.50").unwrap().amount(), dec!(10.50));
        assert_eq!(Money::parse("-10.50").unwrap().amount(), dec!(-10.50));
        assert_eq!(Money::parse("10").unwrap().amount(), dec!(10));
        assert_eq!(Money::parse("1,250.75").unwrap().amount(), dec!(1250.75));
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("$").is_err());
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_cents(600));
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"10.50\"");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);

        let from_number: Money = serde_json::from_str("75").unwrap();
        assert_eq!(from_number.amount(), dec!(75));
    }
}
