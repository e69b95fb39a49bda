//! JSON ledger documents.
//!
//! A ledger is a list of options and a list of directives:
//!
//! ```json
//! {
//!   "options": [{"name": "operating_currency", "value": "USD"}],
//!   "directives": [
//!     {"Pad": {"date": "2013-05-01", "account": "Assets:Checking",
//!              "source_account": "Equity:Opening-Balances"}}
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use padledger_core::{Directive, InternedStr, StringInterner};
use padledger_engine::Options;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One `option` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    /// Option name
    pub name: String,
    /// Raw option value
    pub value: String,
}

/// A decoded ledger document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Options, in file order
    #[serde(default)]
    pub options: Vec<OptionEntry>,
    /// Directives
    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl Ledger {
    /// Decode a ledger from JSON text.
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("invalid ledger JSON")
    }

    /// Read a ledger from `path`, or from stdin when `path` is `-`.
    pub fn load(path: &Path) -> Result<Self> {
        let source = if path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?
        };
        Self::from_json(&source).with_context(|| format!("failed to decode {}", path.display()))
    }

    /// Apply the option entries in order.
    pub fn options(&self) -> Options {
        let mut options = Options::new();
        for entry in &self.options {
            options.set(&entry.name, &entry.value);
        }
        options
    }
}

/// Re-intern account and currency names so repeated names share storage.
///
/// Returns the number of names that were already known.
pub fn reintern_directives(directives: &mut [Directive]) -> usize {
    fn do_intern(s: &mut InternedStr, interner: &mut StringInterner) -> bool {
        let before = interner.len();
        *s = interner.reintern(s);
        interner.len() == before
    }

    let mut interner = StringInterner::new();
    let mut dedup_count = 0;
    let mut count = |s: &mut InternedStr| {
        if do_intern(s, &mut interner) {
            dedup_count += 1;
        }
    };

    for directive in directives.iter_mut() {
        match directive {
            Directive::Transaction(txn) => {
                for posting in &mut txn.postings {
                    count(&mut posting.account);
                    count(&mut posting.units.currency);
                    if let Some(cost) = &mut posting.cost {
                        count(&mut cost.currency);
                    }
                }
            }
            Directive::Balance(balance) => {
                count(&mut balance.account);
                count(&mut balance.amount.currency);
            }
            Directive::Pad(pad) => {
                count(&mut pad.account);
                count(&mut pad.source_account);
            }
            Directive::Open(open) => {
                count(&mut open.account);
                for currency in &mut open.currencies {
                    count(currency);
                }
            }
            Directive::Close(close) => count(&mut close.account),
            Directive::Note(note) => count(&mut note.account),
            Directive::Commodity(commodity) => count(&mut commodity.currency),
            Directive::Price(price) => {
                count(&mut price.currency);
                count(&mut price.amount.currency);
            }
        }
    }

    dedup_count
}
