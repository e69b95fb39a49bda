//! Position type: units held at an optional lot cost.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Amount, Cost};

/// Units of a currency held at an optional cost.
///
/// Cash is held without a cost. Commodities bought at a price carry a
/// [`Cost`], and positions with different costs are distinct lots that never
/// merge.
///
/// ```
/// use padledger_core::{Amount, Cost, Position};
/// use rust_decimal_macros::dec;
///
/// let cash = Position::simple(Amount::new(dec!(1000.00), "USD"));
/// assert!(cash.cost.is_none());
///
/// let lot = Position::with_cost(Amount::new(dec!(-2), "HOOL"), Cost::new(dec!(500), "USD"));
/// assert!(lot.is_negative_at_cost());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// The units held
    pub units: Amount,
    /// The lot cost, if tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Cost>,
}

impl Position {
    /// Create a position without a cost.
    #[must_use]
    pub const fn simple(units: Amount) -> Self {
        Self { units, cost: None }
    }

    /// Create a position held at a cost.
    #[must_use]
    pub const fn with_cost(units: Amount, cost: Cost) -> Self {
        Self {
            units,
            cost: Some(cost),
        }
    }

    /// Check if this position holds zero units.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.units.is_zero()
    }

    /// Currency of the units.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.units.currency
    }

    /// Check whether this position carries a lot cost.
    #[must_use]
    pub const fn has_cost(&self) -> bool {
        self.cost.is_some()
    }

    /// A lot held at cost whose units went below zero.
    ///
    /// Short cash positions are normal; a short lot means a reduction took
    /// more units than the lot held.
    #[must_use]
    pub fn is_negative_at_cost(&self) -> bool {
        self.cost.is_some() && self.units.is_negative()
    }

    /// Same lot, opposite sign.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            units: -&self.units,
            cost: self.cost.clone(),
        }
    }

    /// Check whether `other` belongs to the same lot as this position.
    #[must_use]
    pub fn same_lot(&self, other: &Self) -> bool {
        self.units.currency == other.units.currency && self.cost == other.cost
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.units)?;
        if let Some(cost) = &self.cost {
            write!(f, " {cost}")?;
        }
        Ok(())
    }
}
