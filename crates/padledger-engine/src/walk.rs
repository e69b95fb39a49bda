//! Chronological walk of the directives touching one account.
//!
//! For a target account the walk yields, in time order, the account's Open,
//! the Pads and Balances naming it, and every posting to it or to one of its
//! descendants. Each item carries the position of its directive in the list
//! it was taken from.

use chrono::NaiveDate;
use padledger_core::{Balance, Directive, Open, Pad, Posting, Transaction};

use crate::account::in_family;

/// One step of an account walk.
#[derive(Debug, Clone, Copy)]
pub enum WalkItem<'a> {
    /// The account's Open directive.
    Open {
        /// Position in the directive list.
        index: usize,
        /// The directive.
        open: &'a Open,
    },
    /// A Pad targeting the account.
    Pad {
        /// Position in the directive list.
        index: usize,
        /// The directive.
        pad: &'a Pad,
    },
    /// A Balance asserted on the account.
    Balance {
        /// Position in the directive list.
        index: usize,
        /// The directive.
        balance: &'a Balance,
    },
    /// A posting to the account or one of its descendants.
    Posting {
        /// Position of the owning transaction in the directive list.
        index: usize,
        /// The owning transaction.
        transaction: &'a Transaction,
        /// The posting.
        posting: &'a Posting,
    },
}

impl WalkItem<'_> {
    /// Position of the originating directive.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Open { index, .. }
            | Self::Pad { index, .. }
            | Self::Balance { index, .. }
            | Self::Posting { index, .. } => *index,
        }
    }

    /// Date of the originating directive.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Open { open, .. } => open.date,
            Self::Pad { pad, .. } => pad.date,
            Self::Balance { balance, .. } => balance.date,
            Self::Posting { transaction, .. } => transaction.date,
        }
    }

    /// Rank among items of the same date.
    ///
    /// A Balance asserts the state at the start of its day, so it goes
    /// before that day's Pads and postings.
    const fn day_rank(&self) -> u8 {
        match self {
            Self::Open { .. } => 0,
            Self::Balance { .. } => 1,
            Self::Pad { .. } | Self::Posting { .. } => 2,
        }
    }
}

/// Walk the directives that touch `account` or its descendants.
///
/// Items are ordered by date, then Open, Balance, and finally Pads and
/// postings in list order.
#[must_use]
pub fn walk_account<'a>(directives: &'a [Directive], account: &str) -> Vec<WalkItem<'a>> {
    let mut items = Vec::new();
    for (index, directive) in directives.iter().enumerate() {
        match directive {
            Directive::Open(open) if open.account == account => {
                items.push(WalkItem::Open { index, open });
            }
            Directive::Pad(pad) if pad.account == account => {
                items.push(WalkItem::Pad { index, pad });
            }
            Directive::Balance(balance) if balance.account == account => {
                items.push(WalkItem::Balance { index, balance });
            }
            Directive::Transaction(transaction) => {
                items.extend(
                    transaction
                        .postings
                        .iter()
                        .filter(|posting| in_family(account, &posting.account))
                        .map(|posting| WalkItem::Posting {
                            index,
                            transaction,
                            posting,
                        }),
                );
            }
            _ => {}
        }
    }
    items.sort_by_key(|item| (item.date(), item.day_rank(), item.index()));
    items
}
