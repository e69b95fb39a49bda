//! Account hierarchy index.
//!
//! Balance assertions and pads on an account look at the whole family: the
//! account itself plus every open account below it in the `:`-separated tree.
//! A descendant closed before the date in question drops out of the family.

use chrono::NaiveDate;
use padledger_core::{Directive, InternedStr, Inventory};
use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;

/// Separator between account name components.
pub const SEPARATOR: char = ':';

/// Parent of an account, or `None` for a root component.
#[must_use]
pub fn parent(account: &str) -> Option<&str> {
    account.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
}

/// Number of components in an account name.
#[must_use]
pub fn depth(account: &str) -> usize {
    account.split(SEPARATOR).count()
}

/// Check whether `candidate` is `account` or lies below it.
///
/// `Assets:Bank:Checking` is in the family of `Assets:Bank`;
/// `Assets:Banking` is not.
#[must_use]
pub fn in_family(account: &str, candidate: &str) -> bool {
    candidate
        .strip_prefix(account)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(SEPARATOR))
}

/// The set of accounts a ledger refers to, with their close dates.
#[derive(Debug, Clone, Default)]
pub struct AccountIndex {
    accounts: BTreeSet<InternedStr>,
    closed: HashMap<InternedStr, NaiveDate>,
}

impl AccountIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every account opened, posted to, padded, or asserted on.
    #[must_use]
    pub fn from_directives(directives: &[Directive]) -> Self {
        let mut index = Self::new();
        for directive in directives {
            match directive {
                Directive::Open(open) => index.insert(&open.account),
                Directive::Close(close) => {
                    index.insert(&close.account);
                    index.close(&close.account, close.date);
                }
                Directive::Note(note) => index.insert(&note.account),
                Directive::Balance(balance) => index.insert(&balance.account),
                Directive::Pad(pad) => {
                    index.insert(&pad.account);
                    index.insert(&pad.source_account);
                }
                Directive::Transaction(txn) => {
                    for posting in &txn.postings {
                        index.insert(&posting.account);
                    }
                }
                Directive::Commodity(_) | Directive::Price(_) => {}
            }
        }
        index
    }

    /// Add an account.
    pub fn insert(&mut self, account: &InternedStr) {
        if !self.accounts.contains(account.as_str()) {
            self.accounts.insert(account.clone());
        }
    }

    /// Record that `account` was closed on `date`. The earliest close wins.
    pub fn close(&mut self, account: &InternedStr, date: NaiveDate) {
        self.closed
            .entry(account.clone())
            .and_modify(|d| *d = (*d).min(date))
            .or_insert(date);
    }

    /// Date the account was closed on, if any.
    #[must_use]
    pub fn closed_on(&self, account: &str) -> Option<NaiveDate> {
        self.closed.get(account).copied()
    }

    /// An account counts as open on `date` unless it was closed strictly
    /// before it.
    #[must_use]
    pub fn is_open_on(&self, account: &str, date: NaiveDate) -> bool {
        self.closed_on(account).map_or(true, |closed| closed >= date)
    }

    /// Check whether the account is known.
    #[must_use]
    pub fn contains(&self, account: &str) -> bool {
        self.accounts.contains(account)
    }

    /// Number of known accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if no accounts are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Known accounts strictly below `account`, in name order.
    pub fn descendants<'a>(&'a self, account: &str) -> impl Iterator<Item = &'a InternedStr> + 'a {
        let prefix = format!("{account}{SEPARATOR}");
        self.accounts
            .range::<str, _>((Bound::Excluded(prefix.as_str()), Bound::Unbounded))
            .take_while(move |candidate| candidate.starts_with(prefix.as_str()))
    }

    /// `account` followed by its descendants that are open on `date`.
    ///
    /// The account itself is always included, known or not.
    #[must_use]
    pub fn family(&self, account: &str, date: NaiveDate) -> Vec<InternedStr> {
        let root = self
            .accounts
            .get(account)
            .cloned()
            .unwrap_or_else(|| InternedStr::from(account));
        std::iter::once(root)
            .chain(
                self.descendants(account)
                    .filter(|member| self.is_open_on(member, date))
                    .cloned(),
            )
            .collect()
    }

    /// Merged holdings of the family of `account` on `date`.
    ///
    /// Reads the per-account inventories as they stand; nothing is mutated.
    /// Returns `None` if a lot total does not fit in a decimal.
    #[must_use]
    pub fn aggregate_inventory(
        &self,
        account: &str,
        date: NaiveDate,
        inventories: &HashMap<InternedStr, Inventory>,
    ) -> Option<Inventory> {
        let mut total = Inventory::new();
        for member in self.family(account, date) {
            if let Some(inv) = inventories.get(&member) {
                if !total.merge(inv) {
                    return None;
                }
            }
        }
        Some(total)
    }
}
