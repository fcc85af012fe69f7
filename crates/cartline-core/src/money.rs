//! # Money Module
//!
//! Provides the `Money` type used when line items compute derived amounts.
//!
//! ## Where Amounts Come From
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ATTRIBUTES ARE LOOSE, MONEY IS STRICT                                  │
//! │                                                                         │
//! │  Attribute value           Money::from_value                            │
//! │  ───────────────           ─────────────────                            │
//! │  7            (number) ──► 700 cents                                    │
//! │  12.5         (number) ──► 1250 cents   (parsed as text, never f64)     │
//! │  "12.50"      (string) ──► 1250 cents                                   │
//! │  "0.125"      (string) ──► 13 cents     (half away from zero)           │
//! │  "abc" / true / null   ──► None                                         │
//! │                                                                         │
//! │  Recalculated amounts are written back as "12.50"                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartline_core::money::Money;
//!
//! let price = Money::parse_decimal("10.99").unwrap();
//! assert_eq!(price.cents(), 1099);
//! assert_eq!((price * 2).to_decimal_string(), "21.98");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that refunds and discount lines can be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a decimal amount such as `"12.5"`, `"-3.10"` or `"7"`.
    ///
    /// Digits past the second fractional place round half away from zero.
    /// Exponent notation, thousands separators and empty input are rejected.
    ///
    /// ## Example
    /// ```rust
    /// use cartline_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("12.5").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse_decimal("0.125").unwrap().cents(), 13);
    /// assert_eq!(Money::parse_decimal("-.5").unwrap().cents(), -50);
    /// assert!(Money::parse_decimal("1e3").is_none());
    /// ```
    pub fn parse_decimal(input: &str) -> Option<Money> {
        let text = input.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return None;
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut frac_digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tens = frac_digits.next().unwrap_or(0);
        let units = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|d| d >= 5);

        let mut cents = whole.checked_mul(100)?.checked_add(tens * 10 + units)?;
        if round_up {
            cents = cents.checked_add(1)?;
        }

        Some(Money(if negative { -cents } else { cents }))
    }

    /// Reads an attribute value as money.
    ///
    /// Numbers and numeric strings are accepted; everything else is `None`.
    /// Non-integer JSON numbers go through their shortest textual form, so
    /// `12.5` reads as exactly 1250 cents.
    pub fn from_value(value: &Value) -> Option<Money> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(whole) => whole.checked_mul(100).map(Money),
                None => Money::parse_decimal(&n.to_string()),
            },
            Value::String(s) => Money::parse_decimal(s),
            _ => None,
        }
    }

    /// Formats as a plain decimal with two fractional digits: `"-5.50"`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }

    /// The attribute representation written by recalculation.
    pub fn to_value(&self) -> Value {
        Value::String(self.to_decimal_string())
    }

    /// Calculates tax at the given rate.
    ///
    /// Integer math: `(amount * bps ± 5000) / 10000`, i.e. half away from
    /// zero on the cent, so a refund is taxed as the mirror of the sale.
    /// Uses i128 so large amounts cannot overflow mid-calculation; a result
    /// outside the i64 range saturates.
    ///
    /// ## Example
    /// ```rust
    /// use cartline_core::money::Money;
    /// use cartline_core::types::TaxRate;
    ///
    /// let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
    /// assert_eq!(tax.cents(), 83);
    /// let refund = Money::from_cents(-1000).calculate_tax(TaxRate::from_bps(825));
    /// assert_eq!(refund.cents(), -83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let scaled = self.0 as i128 * rate.bps() as i128;
        let half = if scaled < 0 { -5000 } else { 5000 };
        let tax_cents = (scaled + half) / 10000;
        let tax_cents = i64::try_from(tax_cents).unwrap_or(if tax_cents < 0 { i64::MIN } else { i64::MAX });
        Money::from_cents(tax_cents)
    }

    /// Multiplies a unit price by a line quantity. `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds, clamping at the i64 bounds instead of overflowing.
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug/log formatting only; the cart UI formats for its own locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = self.saturating_add(other);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

/// Lets the cart do `lines.map(..).sum::<Money>()`. Saturates like `Add`.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
