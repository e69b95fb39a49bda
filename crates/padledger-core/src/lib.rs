//! Core types for padledger
//!
//! The value types the reconciliation engine is built on:
//!
//! - [`Amount`] - An exact decimal number with a currency
//! - [`Cost`] - Acquisition cost identifying a lot
//! - [`Position`] - Units held at an optional cost
//! - [`Inventory`] - The lots an account holds at a point in time
//! - [`Directive`] - The closed set of ledger directives (Open, Balance, Pad, ...)
//!
//! # Example
//!
//! ```
//! use padledger_core::{Amount, Cost, Inventory, Position};
//! use rust_decimal_macros::dec;
//!
//! let mut inv = Inventory::new();
//! inv.add(Position::simple(Amount::new(dec!(100.00), "USD")));
//! inv.add(Position::with_cost(Amount::new(dec!(10), "HOOL"), Cost::new(dec!(500), "USD")));
//!
//! assert_eq!(inv.units("USD"), dec!(100.00));
//! assert!(inv.has_cost_lots("HOOL"));
//! assert!(!inv.has_cost_lots("USD"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod cost;
pub mod directive;
pub mod intern;
pub mod inventory;
pub mod position;

pub use amount::Amount;
pub use cost::Cost;
pub use directive::{
    is_sorted, sort_directives, Balance, Close, Commodity, Directive, DirectivePriority, MetaValue,
    Metadata, Note, Open, Pad, Posting, Price, Transaction, PADDING_FLAG,
};
pub use intern::{InternedStr, StringInterner};
pub use inventory::{AddOutcome, Inventory, LotChange};
pub use position::Position;

pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
