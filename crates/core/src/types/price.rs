//! Type-safe price representation using decimal arithmetic.
//!
//! Cart totals are computed by summing line prices, so `Price` is backed by
//! `rust_decimal::Decimal` rather than a float: `0.1 + 0.2` is exactly `0.3`
//! and repeated accumulation never drifts.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input is not a valid decimal amount.
    #[error("invalid price amount: {0}")]
    InvalidAmount(#[from] rust_decimal::Error),
}

/// A unit or aggregate price in the currency's standard unit (e.g. dollars).
///
/// Serializes transparently as its decimal amount, which `rust_decimal`
/// encodes as a JSON string to preserve precision.
///
/// ## Examples
///
/// ```
/// use velvet_mango_core::Price;
///
/// let unit: Price = "19.99".parse().unwrap();
/// assert_eq!(unit.line_total(3).to_string(), "$59.97");
///
/// // A leading dollar sign is accepted
/// assert_eq!(Price::parse("$5").unwrap(), Price::parse("5.00").unwrap());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a `Price` from a string, accepting an optional leading `$`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::InvalidAmount`] if the remainder is not a valid
    /// decimal number.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = s.trim().trim_start_matches('$').parse::<Decimal>()?;
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The extended price for `quantity` units at this unit price.
    #[must_use]
    pub fn line_total(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Whether this price is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
