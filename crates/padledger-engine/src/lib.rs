//! Pad and balance reconciliation for padledger.
//!
//! Takes a date-ordered list of directives and:
//!
//! - checks every `balance` assertion against the running holdings of the
//!   asserted account and all of its sub-accounts
//! - turns each `pad` into the transaction that makes the next failing
//!   assertion pass, dated at the pad and flagged `P`
//! - reports misuse: failed assertions, redundant or unused pads, and
//!   attempts to pad lots held at cost
//!
//! # Example
//!
//! ```
//! use padledger_core::{Amount, Balance, Directive, NaiveDate, Open, Pad};
//! use padledger_engine::process_pads;
//! use rust_decimal_macros::dec;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2013, 5, d).unwrap();
//! let directives = vec![
//!     Directive::Open(Open::new(day(1), "Assets:Checking")),
//!     Directive::Open(Open::new(day(1), "Equity:Opening-Balances")),
//!     Directive::Pad(Pad::new(day(1), "Assets:Checking", "Equity:Opening-Balances")),
//!     Directive::Balance(Balance::new(day(3), "Assets:Checking", Amount::new(dec!(172.45), "USD"))),
//! ];
//!
//! let result = process_pads(&directives);
//! assert!(result.errors.is_empty());
//! assert_eq!(result.padding_transactions.len(), 1);
//! assert_eq!(result.directives.len(), 5);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod error;
pub mod options;
pub mod pad;
pub mod walk;

pub use account::AccountIndex;
pub use error::{ErrorCode, ErrorKind, ReconcileError, Severity};
pub use options::{OptionWarning, Options};
pub use pad::{padding_narration, process_pads, process_pads_with_options, PadResult};
pub use walk::{walk_account, WalkItem};

use padledger_core::Directive;

/// Resolve pads and return the directives with pads replaced by their
/// synthesized transactions.
pub fn expand_pads(directives: &[Directive], options: &Options) -> Vec<Directive> {
    process_pads_with_options(directives, options).expanded()
}
