//! # Money Module
//!
//! Provides the `Money` type for prices and the `TaxRate` used at checkout.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Catalog price 129.99 as f64, times 3:                                  │
//! │    389.96999999999997  ❌ shows up in the cart badge                    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    12999 cents × 3 = 38997 cents → "$389.97"                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_cents(12999); // $129.99
//! let line = price * 3u32;
//! assert_eq!(line.to_string(), "$389.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// Serialized as a bare integer so persisted orders stay compact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(4299).cents(), 4299);
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

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies a unit price by a line quantity.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit = Money::from_cents(2999);
    /// assert_eq!(unit.multiply_quantity(2).cents(), 5998);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }

    /// Calculates tax on this amount.
    ///
    /// Integer math: `(amount * bps + 5000) / 10000`, i.e. half-up rounding
    /// to the nearest cent. Uses i128 so large carts cannot overflow.
    ///
    /// ```rust
    /// use storefront_core::money::{Money, TaxRate};
    ///
    /// // $42.99 at 10% = $4.299 → $4.30
    /// let tax = Money::from_cents(4299).calculate_tax(TaxRate::from_bps(1000));
    /// assert_eq!(tax.cents(), 430);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Quantity multiplication (cart quantities are `u32`).
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Summing line totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bps = 0.01%).
///
/// Checkout uses 1000 bps (10%) unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// The flat rate applied by the checkout screen.
    pub const CHECKOUT_DEFAULT: TaxRate = TaxRate(1000);

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_parts() {
        let money = Money::from_cents(12999);
        assert_eq!(money.dollars(), 129);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(12999).to_string(), "$129.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_sum_of_lines() {
        let lines = [
            Money::from_cents(12999) * 2,
            Money::from_cents(2999) * 1,
        ];
        let total: Money = lines.into_iter().sum();
        assert_eq!(total.cents(), 28997);
    }

    #[test]
    fn test_checkout_tax_rounding() {
        // $129.99 at 10% = $12.999 → $13.00
        let tax = Money::from_cents(12999).calculate_tax(TaxRate::CHECKOUT_DEFAULT);
        assert_eq!(tax.cents(), 1300);

        // $10.00 at 8.25% = $0.825 → $0.83
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_cents(4299)).unwrap();
        assert_eq!(json, "4299");
        let rate: TaxRate = serde_json::from_str("1000").unwrap();
        assert_eq!(rate, TaxRate::CHECKOUT_DEFAULT);
    }
}
