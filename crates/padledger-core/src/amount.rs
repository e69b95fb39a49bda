//! Amount type: an exact decimal quantity paired with a currency.
//!
//! Every number in the ledger is a [`Decimal`], so balance checks and padding
//! differences are computed without binary floating point rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

use crate::intern::InternedStr;

/// A quantity of a single currency or commodity.
///
/// # Examples
///
/// ```
/// use padledger_core::Amount;
/// use rust_decimal_macros::dec;
///
/// let asserted = Amount::new(dec!(172.45), "USD");
/// let held = Amount::new(dec!(100.00), "USD");
///
/// let shortfall = asserted.checked_sub(&held).unwrap();
/// assert_eq!(shortfall.number, dec!(72.45));
/// assert_eq!(shortfall.to_string(), "72.45 USD");
///
/// let huge = Amount::new(rust_decimal::Decimal::MAX, "USD");
/// assert!(huge.checked_sub(&Amount::new(dec!(-1), "USD")).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    /// The decimal quantity
    pub number: Decimal,
    /// The currency code (e.g., "USD", "CAD", "HOOL")
    pub currency: InternedStr,
}

impl Amount {
    /// Create a new amount.
    #[must_use]
    pub fn new(number: Decimal, currency: impl Into<InternedStr>) -> Self {
        Self {
            number,
            currency: currency.into(),
        }
    }

    /// Create a zero amount of the given currency.
    #[must_use]
    pub fn zero(currency: impl Into<InternedStr>) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Check if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.number.is_zero()
    }

    /// Check if the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.number < Decimal::ZERO
    }

    /// Absolute value, same currency.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            number: self.number.abs(),
            currency: self.currency.clone(),
        }
    }

    /// Same currency, different number.
    #[must_use]
    pub fn with_number(&self, number: Decimal) -> Self {
        Self {
            number,
            currency: self.currency.clone(),
        }
    }

    /// `self + other`, or `None` when the currencies differ or the sum
    /// does not fit in a [`Decimal`].
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        if self.currency != other.currency {
            return None;
        }
        self.number
            .checked_add(other.number)
            .map(|number| self.with_number(number))
    }

    /// `self - other`, or `None` when the currencies differ or the
    /// difference does not fit in a [`Decimal`].
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if self.currency != other.currency {
            return None;
        }
        self.number
            .checked_sub(other.number)
            .map(|number| self.with_number(number))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.currency)
    }
}

impl Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        self.with_number(-self.number)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(mut self) -> Self {
        self.number = -self.number;
        self
    }
}
