//! Inventory type: the running holdings of one account.
//!
//! An [`Inventory`] is a set of lots keyed by (currency, cost). Adding a
//! position merges it into the lot with the same key or opens a new lot;
//! lots that reach exactly zero are dropped. Reductions that push a lot held
//! at cost below zero are reported through [`AddOutcome`], never refused.
//! A sum that does not fit in a [`Decimal`] leaves the lot unchanged and is
//! reported as [`LotChange::Overflow`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Amount, Position};

/// How a lot changed when a position was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LotChange {
    /// The position had zero units; nothing changed.
    Ignored,
    /// No lot with this key existed; a new one was opened.
    Created,
    /// An existing lot grew in magnitude.
    Augmented,
    /// An existing lot shrank or flipped sign.
    Reduced,
    /// An existing lot was reduced to exactly zero and removed.
    Closed,
    /// The new units do not fit in a decimal; the lot was left unchanged.
    Overflow,
}

/// Result of [`Inventory::add_position`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// The lot after the addition. For `Closed` this is the removed lot,
    /// for `Ignored` the incoming position, and for `Overflow` the
    /// unchanged lot.
    pub position: Position,
    /// What happened to the lot.
    pub change: LotChange,
    /// The resulting lot is held at cost with negative units.
    pub negative_at_cost: bool,
}

/// Holdings of an account at a point in the scan.
///
/// # Examples
///
/// ```
/// use padledger_core::{Amount, Cost, Inventory, LotChange, Position};
/// use rust_decimal_macros::dec;
///
/// let mut inv = Inventory::new();
/// inv.add(Position::simple(Amount::new(dec!(100), "USD")));
/// inv.add(Position::with_cost(Amount::new(dec!(10), "HOOL"), Cost::new(dec!(500), "USD")));
///
/// let sold = inv.add_position(Position::with_cost(
///     Amount::new(dec!(-12), "HOOL"),
///     Cost::new(dec!(500), "USD"),
/// ));
/// assert_eq!(sold.change, LotChange::Reduced);
/// assert!(sold.negative_at_cost);
///
/// assert_eq!(inv.units("USD"), dec!(100));
/// assert!(inv.has_cost_lots("HOOL"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    positions: Vec<Position>,
}

impl Inventory {
    /// Create an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All lots, in the order they were opened.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Check if the inventory holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.iter().all(Position::is_empty)
    }

    /// Number of open lots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Total units of a currency across all lots, ignoring cost.
    ///
    /// # Panics
    ///
    /// Panics if the total does not fit in a [`Decimal`]; see
    /// [`Inventory::checked_units`].
    #[must_use]
    pub fn units(&self, currency: &str) -> Decimal {
        self.positions
            .iter()
            .filter(|p| p.units.currency == currency)
            .map(|p| p.units.number)
            .sum()
    }

    /// Total units of a currency, or `None` if the total overflows.
    #[must_use]
    pub fn checked_units(&self, currency: &str) -> Option<Decimal> {
        self.positions
            .iter()
            .filter(|p| p.units.currency == currency)
            .try_fold(Decimal::ZERO, |total, p| total.checked_add(p.units.number))
    }

    /// Check whether any lot of `currency` is held at cost.
    #[must_use]
    pub fn has_cost_lots(&self, currency: &str) -> bool {
        self.positions
            .iter()
            .any(|p| p.units.currency == currency && p.has_cost())
    }

    /// Check whether any lot is held at cost with negative units.
    #[must_use]
    pub fn has_negative_at_cost(&self) -> bool {
        self.positions.iter().any(Position::is_negative_at_cost)
    }

    /// Currencies with non-zero holdings, sorted.
    #[must_use]
    pub fn currencies(&self) -> Vec<&str> {
        let mut currencies: Vec<&str> = self
            .positions
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.units.currency.as_str())
            .collect();
        currencies.sort_unstable();
        currencies.dedup();
        currencies
    }

    /// Add a position, merging it into the lot with the same currency and cost.
    ///
    /// The returned [`AddOutcome`] carries the resulting lot and flags a lot
    /// held at cost that went negative. The caller decides whether that is
    /// worth reporting.
    pub fn add_position(&mut self, position: Position) -> AddOutcome {
        if position.is_empty() {
            return AddOutcome {
                position,
                change: LotChange::Ignored,
                negative_at_cost: false,
            };
        }

        let Some(index) = self.positions.iter().position(|p| p.same_lot(&position)) else {
            let negative_at_cost = position.is_negative_at_cost();
            self.positions.push(position.clone());
            return AddOutcome {
                position,
                change: LotChange::Created,
                negative_at_cost,
            };
        };

        let existing = &mut self.positions[index];
        let before = existing.units.number;
        let Some(after) = before.checked_add(position.units.number) else {
            return AddOutcome {
                position: existing.clone(),
                change: LotChange::Overflow,
                negative_at_cost: false,
            };
        };
        existing.units.number = after;

        if after.is_zero() {
            let closed = self.positions.remove(index);
            return AddOutcome {
                position: closed,
                change: LotChange::Closed,
                negative_at_cost: false,
            };
        }

        let change = if before.is_sign_negative() == position.units.number.is_sign_negative() {
            LotChange::Augmented
        } else {
            LotChange::Reduced
        };
        AddOutcome {
            position: existing.clone(),
            change,
            negative_at_cost: existing.is_negative_at_cost(),
        }
    }

    /// Add a position, discarding the outcome.
    pub fn add(&mut self, position: Position) {
        self.add_position(position);
    }

    /// Add signed units of `amount` to the cost-less lot of its currency.
    pub fn add_amount(&mut self, amount: Amount) -> AddOutcome {
        self.add_position(Position::simple(amount))
    }

    /// Add every lot of `other` into this inventory.
    ///
    /// Returns `false` if some lot overflowed and was left unchanged.
    pub fn merge(&mut self, other: &Self) -> bool {
        let mut fits = true;
        for pos in &other.positions {
            fits &= self.add_position(pos.clone()).change != LotChange::Overflow;
        }
        fits
    }

    /// Copy of this inventory with costs stripped, one lot per currency.
    #[must_use]
    pub fn at_units(&self) -> Self {
        self.positions
            .iter()
            .map(|p| Position::simple(p.units.clone()))
            .collect()
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }
        for (i, pos) in self.positions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{pos}")?;
        }
        Ok(())
    }
}

impl FromIterator<Position> for Inventory {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut inv = Self::new();
        for pos in iter {
            inv.add(pos);
        }
        inv
    }
}
