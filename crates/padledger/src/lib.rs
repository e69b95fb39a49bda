//! Padledger command-line tools.
//!
//! - `padledger-check`: check balance assertions and resolve pad directives
//!   in a JSON ledger
//!
//! # Example Usage
//!
//! ```bash
//! padledger-check ledger.json
//! padledger-check --print-padding --emit resolved.json ledger.json
//! cat ledger.json | padledger-check --format json -
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod ledger;
pub mod report;
