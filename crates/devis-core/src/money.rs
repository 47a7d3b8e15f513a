//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floating point totals:                                            │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │    A quote re-aggregated twice may drift in the last digit.             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Line totals, subtotals, tax buckets and grand totals are all i64.    │
//! │    Aggregating the same rows always yields the same bits.               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use devis_core::money::Money;
//!
//! let price = Money::from_cents(2500); // 25.00
//! let total = price + Money::from_cents(3500);
//! assert_eq!(total.cents(), 6000);
//!
//! // User input is parsed, never converted from floats
//! let parsed: Money = "12,50".parse().unwrap();
//! assert_eq!(parsed.cents(), 1250);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{Quantity, TaxRate};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  ItemRow.unit_price ──► × quantity ──► ItemRow.line_total               │
/// │                                              │                          │
/// │                         ┌────────────────────┼──────────────┐           │
/// │                         ▼                    ▼              ▼           │
/// │               Section.subtotal     tax_breakdown[rate]   total_pre_tax  │
/// │                                              │                          │
/// │                                              ▼                          │
/// │                                  total_tax ──► total_with_tax           │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use devis_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use devis_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(850, 0).cents(), 85000);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
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
    pub const fn cents_part(&self) -> i64 {
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

    /// Calculates tax on this amount, rounding half up to the cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use devis_core::money::Money;
    /// use devis_core::types::TaxRate;
    ///
    /// let base = Money::from_cents(8500);   // 85.00
    /// let rate = TaxRate::from_bps(1000);   // 10%
    /// assert_eq!(base.calculate_tax(rate).cents(), 850);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 prevents overflow on large amounts
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_wide(tax_cents)
    }

    /// Multiplies a unit price by a quantity, rounding half up to the cent.
    ///
    /// Quantities are stored in thousandths, so whole quantities multiply
    /// exactly and fractional ones (e.g. 2.5 m²) round only once.
    ///
    /// ## Example
    /// ```rust
    /// use devis_core::money::Money;
    /// use devis_core::types::Quantity;
    ///
    /// let unit_price = Money::from_cents(2500);
    /// assert_eq!(unit_price.multiply_quantity(Quantity::from_units(2)).cents(), 5000);
    /// assert_eq!(unit_price.multiply_quantity(Quantity::from_milli(2500)).cents(), 6250);
    /// ```
    pub fn multiply_quantity(&self, qty: Quantity) -> Money {
        let product = self.0 as i128 * qty.milli() as i128;
        let rounded = if product >= 0 {
            (product + 500) / 1000
        } else {
            (product - 500) / 1000
        };
        Money::from_wide(rounded)
    }

    /// Narrows an i128 intermediate, clamping at the i64 bounds.
    fn from_wide(value: i128) -> Money {
        match i64::try_from(value) {
            Ok(cents) => Money(cents),
            Err(_) if value < 0 => Money(i64::MIN),
            Err(_) => Money(i64::MAX),
        }
    }
}

// =============================================================================
// Decimal Parsing
// =============================================================================

/// Parses a decimal string into an integer scaled by `10^scale`.
///
/// Accepts `.` or `,` as the decimal separator and a leading `-`.
/// Rejects empty input, stray characters and more than `scale` decimals.
pub(crate) fn parse_scaled(input: &str, scale: u32) -> Result<i64, String> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (whole, fraction) = match digits.find(['.', ',']) {
        Some(pos) => (&digits[..pos], &digits[pos + 1..]),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err("expected a number".to_string());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(format!("'{}' is not a number", input));
    }
    if fraction.len() > scale as usize {
        return Err(format!("at most {} decimal places allowed", scale));
    }

    let factor = 10_i64.pow(scale);
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<i64>()
            .map_err(|_| "number is too large".to_string())?
    };
    let fraction_value = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = scale as usize);
        padded
            .parse::<i64>()
            .map_err(|_| "number is too large".to_string())?
    };

    let value = whole_value
        .checked_mul(factor)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(|| "number is too large".to_string())?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// For debugging and logs. The app's `format_currency` handles the
/// configured currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.cents_part())
    }
}

/// Parses user-entered amounts such as `"25"`, `"25.5"` or `"25,50"`.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, 2)
            .map(Money::from_cents)
            .map_err(|reason| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason,
            })
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturates at the i64 bounds instead of wrapping.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
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
