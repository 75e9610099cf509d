//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Parsed as f64:                                                         │
//! │    "35.35" → 35.35 → ×100 = 3534.9999999999995  ❌                      │
//! │    ceil(price × 0.2) can land one point high on an unlucky price       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "35.35" → 3535 cents, exactly                                       │
//! │    "Is it a multiple of 0.25?"  → 3535 % 25 == 0                       │
//! │    "ceil(price × 0.2)"          → ceil(cents / 500)                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Amounts travel as strings with exactly two fractional digits (`"12.34"`).
//! [`Money`] parses and renders exactly that format, and serializes through
//! it with serde.
//!
//! ## Usage
//! ```rust
//! use receipt_core::money::Money;
//!
//! let total: Money = "35.35".parse().unwrap();
//! assert_eq!(total.cents(), 3535);
//! assert_eq!(total.to_string(), "35.35");
//!
//! assert!("35.3".parse::<Money>().is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64**: matches the SQLite INTEGER column it is stored in
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **String serde**: JSON carries `"12.34"`, never a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use receipt_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the amount has no cents (`"12.00"`).
    ///
    /// ## Example
    /// ```rust
    /// use receipt_core::money::Money;
    ///
    /// assert!(Money::from_cents(1200).is_whole_dollars());
    /// assert!(!Money::from_cents(1201).is_whole_dollars());
    /// ```
    #[inline]
    pub const fn is_whole_dollars(&self) -> bool {
        self.0 % 100 == 0
    }

    /// Checks if the amount is an exact multiple of `step`.
    ///
    /// A zero `step` only divides zero.
    ///
    /// ## Example
    /// ```rust
    /// use receipt_core::money::Money;
    ///
    /// let quarter = Money::from_cents(25);
    /// assert!(Money::from_cents(975).is_multiple_of(quarter));
    /// assert!(!Money::from_cents(3535).is_multiple_of(quarter));
    /// ```
    #[inline]
    pub const fn is_multiple_of(&self, step: Money) -> bool {
        if step.0 == 0 {
            return self.0 == 0;
        }
        self.0 % step.0 == 0
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses the two-decimal wire format: one or more ASCII digits, a dot, and
/// exactly two ASCII digits. Signs, separators and exponents are rejected.
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidMoney {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (whole, fraction) = input
            .split_once('.')
            .ok_or_else(|| invalid("expected a decimal point"))?;

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected digits before the decimal point"));
        }

        if fraction.len() != 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected exactly two digits after the decimal point"));
        }

        let overflow = || CoreError::MoneyOverflow {
            input: input.to_string(),
        };

        // Both halves are all-digit here, so parsing can only fail on overflow
        let dollars: i64 = whole.parse().map_err(|_| overflow())?;
        let cents: i64 = fraction.parse().map_err(|_| overflow())?;

        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Money)
            .ok_or_else(overflow)
    }
}

impl TryFrom<String> for Money {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the wire format (`"12.34"`), without a currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
