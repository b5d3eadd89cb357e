//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Pence                                            │
//! │    A 60p item paid with a £1 coin owes exactly 40 pence of change.     │
//! │    Coin counts multiplied by integer face values can never drift.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vendo_core::money::Money;
//!
//! let price = Money::from_pence(60);
//! let paid = Money::from_pence(100);
//! assert_eq!((paid - price).pence(), 40);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in pence (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: lets subtraction express a shortfall naturally;
///   the coin store rejects negative change requests explicitly
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for configuration and receipts
///
/// Every monetary value in the system flows through this type: item prices,
/// coin face values, store totals, change due.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from pence.
    ///
    /// ## Example
    /// ```rust
    /// use vendo_core::money::Money;
    ///
    /// let price = Money::from_pence(170); // £1.70
    /// assert_eq!(price.pence(), 170);
    /// ```
    #[inline]
    pub const fn from_pence(pence: i64) -> Self {
        Money(pence)
    }

    /// Returns the value in pence.
    #[inline]
    pub const fn pence(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (pounds) portion.
    #[inline]
    pub const fn pounds(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (pence) portion (always 0-99).
    #[inline]
    pub const fn pence_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable `£p.pp` format.
///
/// ## Note
/// This is for log events and debugging, not receipt printing.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}£{}.{:02}", sign, self.pounds().abs(), self.pence_part())
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a count (face value × coin count).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pence() {
        let money = Money::from_pence(170);
        assert_eq!(money.pence(), 170);
        assert_eq!(money.pounds(), 1);
        assert_eq!(money.pence_part(), 70);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_pence(170)), "£1.70");
        assert_eq!(format!("{}", Money::from_pence(40)), "£0.40");
        assert_eq!(format!("{}", Money::from_pence(0)), "£0.00");
        assert_eq!(format!("{}", Money::from_pence(-70)), "-£0.70");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_pence(100);
        let b = Money::from_pence(60);

        assert_eq!((a + b).pence(), 160);
        assert_eq!((a - b).pence(), 40);
        assert_eq!((Money::from_pence(50) * 7).pence(), 350);
    }

    #[test]
    fn test_comparisons() {
        assert!(Money::from_pence(60) < Money::from_pence(100));
        assert!(Money::zero().is_zero());
        assert!(Money::from_pence(-1).is_negative());
        assert!(!Money::from_pence(1).is_negative());
    }

    #[test]
    fn test_shortfall_is_negative() {
        // Paying 50p towards a 60p item leaves a 10p shortfall
        let credit = Money::from_pence(50);
        let price = Money::from_pence(60);
        assert!((credit - price).is_negative());
    }
}
