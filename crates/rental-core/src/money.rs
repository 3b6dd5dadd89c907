//! # Money Module
//!
//! Provides the `Money` type for deposits, rates, fees and refunds.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  deposit 2000.00 − (late 1125.10 + cleaning 200.00 + damage 674.90)     │
//! │  must reconcile to exactly 0.00; floats drift, cents do not.            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every amount is an i64 count of the smallest currency unit.          │
//! │    Fractional multipliers (1.5×, 10%) are basis points.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rental_core::money::Money;
//! use rental_core::types::RateMultiplier;
//!
//! let daily_rate = Money::from_major_minor(500, 0);
//! let late_rate = daily_rate.apply_multiplier(RateMultiplier::from_bps(15000));
//! assert_eq!(late_rate, Money::from_major_minor(750, 0));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use ts_rs::TS;

use crate::types::RateMultiplier;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Signed: a negative net refund is an amount the customer owes.
/// Serializes as a bare integer number of cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use rental_core::money::Money;
    ///
    /// let deposit = Money::from_cents(200_000);
    /// assert_eq!(deposit.cents(), 200_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    ///
    /// ```rust
    /// use rental_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-50).floor_zero(), Money::zero());
    /// assert_eq!(Money::from_cents(50).floor_zero(), Money::from_cents(50));
    /// ```
    #[inline]
    pub fn floor_zero(self) -> Self {
        Money(self.0.max(0))
    }

    /// Multiplies by a basis-point multiplier, rounding half up to the cent.
    ///
    /// ## Implementation
    /// `(amount * bps + 5000) / 10000` in i128, the same rounding used for
    /// every fractional rule (late-fee multiplier, damage multipliers).
    ///
    /// Saturates at the i64 bounds; use [`Money::checked_apply_multiplier`]
    /// where an out-of-range result must be reported.
    pub fn apply_multiplier(&self, multiplier: RateMultiplier) -> Money {
        self.checked_apply_multiplier(multiplier).unwrap_or(if self.0 < 0 {
            Money(i64::MIN)
        } else {
            Money(i64::MAX)
        })
    }

    /// Like [`Money::apply_multiplier`], `None` when the result leaves i64.
    pub fn checked_apply_multiplier(&self, multiplier: RateMultiplier) -> Option<Money> {
        let scaled = (self.0 as i128 * multiplier.bps() as i128 + 5000) / 10000;
        i64::try_from(scaled).ok().map(Money)
    }

    /// Overflow-checked addition.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Overflow-checked subtraction.
    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Overflow-checked multiplication by a count (days, units).
    ///
    /// ```rust
    /// use rental_core::money::Money;
    ///
    /// let per_unit = Money::from_cents(200_000);
    /// assert_eq!(per_unit.checked_mul(2), Some(Money::from_cents(400_000)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    /// ```
    #[inline]
    pub fn checked_mul(self, factor: i64) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented formatting; the UI formats currency itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a unit count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
