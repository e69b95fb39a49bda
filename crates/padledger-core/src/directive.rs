//! Directive types.
//!
//! The reconciliation pass understands a closed set of dated directives:
//!
//! - [`Open`] and [`Close`] bracket the life of an account
//! - [`Transaction`] moves units between accounts
//! - [`Balance`] asserts what an account holds at the start of a day
//! - [`Pad`] lets the next failing [`Balance`] be fixed by a synthesized transaction
//! - [`Commodity`], [`Price`] and [`Note`] are carried through unchanged

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::intern::InternedStr;
use crate::{Amount, Cost, Position};

/// Flag set on transactions synthesized for a pad.
pub const PADDING_FLAG: char = 'P';

/// Metadata value types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaValue {
    /// String value
    String(String),
    /// Account reference
    Account(String),
    /// Currency code
    Currency(String),
    /// Date value
    Date(NaiveDate),
    /// Numeric value
    Number(Decimal),
    /// Boolean value
    Bool(bool),
    /// Amount value
    Amount(Amount),
    /// Null value
    None,
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Account(s) | Self::Currency(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Amount(a) => write!(f, "{a}"),
            Self::None => write!(f, "None"),
        }
    }
}

/// Key-value map attached to directives and postings.
pub type Metadata = HashMap<String, MetaValue>;

/// One leg of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Account the units move into (or out of, when negative)
    pub account: InternedStr,
    /// Signed units
    pub units: Amount,
    /// Lot cost, when the units are held at cost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Cost>,
    /// Posting flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<char>,
    /// Posting metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: Metadata,
}

impl Posting {
    /// Create a posting of plain units.
    #[must_use]
    pub fn new(account: impl Into<InternedStr>, units: Amount) -> Self {
        Self {
            account: account.into(),
            units,
            cost: None,
            flag: None,
            meta: Metadata::new(),
        }
    }

    /// Hold the units at a lot cost.
    #[must_use]
    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Set the posting flag.
    #[must_use]
    pub const fn with_flag(mut self, flag: char) -> Self {
        self.flag = Some(flag);
        self
    }

    /// The position this posting adds to its account's inventory.
    #[must_use]
    pub fn position(&self) -> Position {
        Position {
            units: self.units.clone(),
            cost: self.cost.clone(),
        }
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        if let Some(flag) = self.flag {
            write!(f, "{flag} ")?;
        }
        write!(f, "{}  {}", self.account, self.units)?;
        if let Some(cost) = &self.cost {
            write!(f, " {cost}")?;
        }
        Ok(())
    }
}

/// Ordering rank of directives sharing a date.
///
/// A balance assertion describes the state at the start of its day, so it
/// ranks ahead of everything that happens during that day. Directives of
/// equal rank keep their authoring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirectivePriority {
    /// Accounts exist before anything touches them
    Open = 0,
    /// Assertions see the state before the day's activity
    Balance = 1,
    /// Transactions, pads and everything else, in authoring order
    Entry = 2,
    /// Accounts close after the day's activity
    Close = 3,
}

/// A dated ledger directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// Opens an account
    Open(Open),
    /// Closes an account
    Close(Close),
    /// Declares a commodity
    Commodity(Commodity),
    /// Records a price
    Price(Price),
    /// Attaches a note to an account
    Note(Note),
    /// Asserts an account balance
    Balance(Balance),
    /// Marks an account to be padded from a source account
    Pad(Pad),
    /// Moves units between accounts
    Transaction(Transaction),
}

impl Directive {
    /// Date of the directive.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Open(d) => d.date,
            Self::Close(d) => d.date,
            Self::Commodity(d) => d.date,
            Self::Price(d) => d.date,
            Self::Note(d) => d.date,
            Self::Balance(d) => d.date,
            Self::Pad(d) => d.date,
            Self::Transaction(d) => d.date,
        }
    }

    /// Metadata of the directive.
    #[must_use]
    pub const fn meta(&self) -> &Metadata {
        match self {
            Self::Open(d) => &d.meta,
            Self::Close(d) => &d.meta,
            Self::Commodity(d) => &d.meta,
            Self::Price(d) => &d.meta,
            Self::Note(d) => &d.meta,
            Self::Balance(d) => &d.meta,
            Self::Pad(d) => &d.meta,
            Self::Transaction(d) => &d.meta,
        }
    }

    /// Lowercase keyword of the directive type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::Close(_) => "close",
            Self::Commodity(_) => "commodity",
            Self::Price(_) => "price",
            Self::Note(_) => "note",
            Self::Balance(_) => "balance",
            Self::Pad(_) => "pad",
            Self::Transaction(_) => "transaction",
        }
    }

    /// Same-date ordering rank.
    #[must_use]
    pub const fn priority(&self) -> DirectivePriority {
        match self {
            Self::Open(_) => DirectivePriority::Open,
            Self::Balance(_) => DirectivePriority::Balance,
            Self::Close(_) => DirectivePriority::Close,
            Self::Commodity(_)
            | Self::Price(_)
            | Self::Note(_)
            | Self::Pad(_)
            | Self::Transaction(_) => DirectivePriority::Entry,
        }
    }

    /// Get as a transaction, if this is one.
    #[must_use]
    pub const fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Transaction(t) => Some(t),
            _ => None,
        }
    }

    /// Get as a pad, if this is one.
    #[must_use]
    pub const fn as_pad(&self) -> Option<&Pad> {
        match self {
            Self::Pad(p) => Some(p),
            _ => None,
        }
    }

    /// Get as a balance assertion, if this is one.
    #[must_use]
    pub const fn as_balance(&self) -> Option<&Balance> {
        match self {
            Self::Balance(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(d) => fmt::Display::fmt(d, f),
            Self::Close(d) => fmt::Display::fmt(d, f),
            Self::Commodity(d) => fmt::Display::fmt(d, f),
            Self::Price(d) => fmt::Display::fmt(d, f),
            Self::Note(d) => fmt::Display::fmt(d, f),
            Self::Balance(d) => fmt::Display::fmt(d, f),
            Self::Pad(d) => fmt::Display::fmt(d, f),
            Self::Transaction(d) => fmt::Display::fmt(d, f),
        }
    }
}

/// Sort directives by date, then by [`DirectivePriority`].
///
/// The sort is stable: directives of the same date and rank keep their
/// authoring order.
pub fn sort_directives(directives: &mut [Directive]) {
    directives.sort_by(|a, b| {
        a.date()
            .cmp(&b.date())
            .then_with(|| a.priority().cmp(&b.priority()))
    });
}

/// Check whether directives are already in [`sort_directives`] order.
#[must_use]
pub fn is_sorted(directives: &[Directive]) -> bool {
    directives
        .windows(2)
        .all(|w| (w[0].date(), w[0].priority()) <= (w[1].date(), w[1].priority()))
}

/// A transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction date
    pub date: NaiveDate,
    /// Transaction flag (`*`, `!`, or [`PADDING_FLAG`])
    pub flag: char,
    /// Payee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,
    /// Narration
    #[serde(default)]
    pub narration: String,
    /// Tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Links
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    /// Transaction metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: Metadata,
    /// Postings
    pub postings: Vec<Posting>,
}

impl Transaction {
    /// Create a cleared (`*`) transaction with no postings.
    #[must_use]
    pub fn new(date: NaiveDate, narration: impl Into<String>) -> Self {
        Self {
            date,
            flag: '*',
            payee: None,
            narration: narration.into(),
            tags: Vec::new(),
            links: Vec::new(),
            meta: Metadata::new(),
            postings: Vec::new(),
        }
    }

    /// Set the flag.
    #[must_use]
    pub const fn with_flag(mut self, flag: char) -> Self {
        self.flag = flag;
        self
    }

    /// Set the payee.
    #[must_use]
    pub fn with_payee(mut self, payee: impl Into<String>) -> Self {
        self.payee = Some(payee.into());
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Replace the metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: Metadata) -> Self {
        self.meta = meta;
        self
    }

    /// Add a posting.
    #[must_use]
    pub fn with_posting(mut self, posting: Posting) -> Self {
        self.postings.push(posting);
        self
    }

    /// Check if this transaction was synthesized for a pad.
    #[must_use]
    pub const fn is_padding(&self) -> bool {
        self.flag == PADDING_FLAG
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.date, self.flag)?;
        if let Some(payee) = &self.payee {
            write!(f, "\"{payee}\" ")?;
        }
        write!(f, "\"{}\"", self.narration)?;
        for tag in &self.tags {
            write!(f, " #{tag}")?;
        }
        for link in &self.links {
            write!(f, " ^{link}")?;
        }
        for posting in &self.postings {
            write!(f, "\n{posting}")?;
        }
        Ok(())
    }
}

/// A balance assertion, checked against the state at the start of its date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Assertion date
    pub date: NaiveDate,
    /// Account to check, including its sub-accounts
    pub account: InternedStr,
    /// Expected amount
    pub amount: Amount,
    /// Explicit tolerance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<Decimal>,
    /// Metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: Metadata,
}

impl Balance {
    /// Create a balance assertion with exact matching.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<InternedStr>, amount: Amount) -> Self {
        Self {
            date,
            account: account.into(),
            amount,
            tolerance: None,
            meta: Metadata::new(),
        }
    }

    /// Set an explicit tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} balance {} {}", self.date, self.account, self.amount)?;
        if let Some(tol) = self.tolerance {
            write!(f, " ~ {tol}")?;
        }
        Ok(())
    }
}

/// Opens an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Open {
    /// Opening date
    pub date: NaiveDate,
    /// Account name, e.g. `Assets:Bank:Checking`
    pub account: InternedStr,
    /// Allowed currencies; empty allows any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub currencies: Vec<InternedStr>,
    /// Metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: Metadata,
}

impl Open {
    /// Create an open directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<InternedStr>) -> Self {
        Self {
            date,
            account: account.into(),
            currencies: Vec::new(),
            meta: Metadata::new(),
        }
    }

    /// Restrict the account to the given currencies.
    #[must_use]
    pub fn with_currencies(mut self, currencies: Vec<InternedStr>) -> Self {
        self.currencies = currencies;
        self
    }
}

impl fmt::Display for Open {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} open {}", self.date, self.account)?;
        for (i, currency) in self.currencies.iter().enumerate() {
            write!(f, "{}{currency}", if i == 0 { " " } else { "," })?;
        }
        Ok(())
    }
}

/// Closes an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Close {
    /// Closing date
    pub date: NaiveDate,
    /// Account name
    pub account: InternedStr,
    /// Metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: Metadata,
}

impl Close {
    /// Create a close directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<InternedStr>) -> Self {
        Self {
            date,
            account: account.into(),
            meta: Metadata::new(),
        }
    }
}

impl fmt::Display for Close {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} close {}", self.date, self.account)
    }
}

/// Declares a commodity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    /// Declaration date
    pub date: NaiveDate,
    /// Commodity code
    pub currency: InternedStr,
    /// Metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: Metadata,
}

impl Commodity {
    /// Create a commodity declaration.
    #[must_use]
    pub fn new(date: NaiveDate, currency: impl Into<InternedStr>) -> Self {
        Self {
            date,
            currency: currency.into(),
            meta: Metadata::new(),
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} commodity {}", self.date, self.currency)
    }
}

/// Pads `account` from `source_account` so the next failing balance
/// assertion on `account` passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pad {
    /// Pad date; synthesized transactions are dated here
    pub date: NaiveDate,
    /// Account to pad
    pub account: InternedStr,
    /// Account the difference is taken from
    pub source_account: InternedStr,
    /// Metadata, copied onto synthesized transactions
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: Metadata,
}

impl Pad {
    /// Create a pad directive.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        account: impl Into<InternedStr>,
        source_account: impl Into<InternedStr>,
    ) -> Self {
        Self {
            date,
            account: account.into(),
            source_account: source_account.into(),
            meta: Metadata::new(),
        }
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pad {} {}", self.date, self.account, self.source_account)
    }
}

/// Attaches a note to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note date
    pub date: NaiveDate,
    /// Account
    pub account: InternedStr,
    /// Note text
    pub comment: String,
    /// Metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: Metadata,
}

impl Note {
    /// Create a note.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<InternedStr>, comment: impl Into<String>) -> Self {
        Self {
            date,
            account: account.into(),
            comment: comment.into(),
            meta: Metadata::new(),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} note {} \"{}\"", self.date, self.account, self.comment)
    }
}

/// Records the price of a commodity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Price date
    pub date: NaiveDate,
    /// Commodity being priced
    pub currency: InternedStr,
    /// Price per unit
    pub amount: Amount,
    /// Metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: Metadata,
}

impl Price {
    /// Create a price directive.
    #[must_use]
    pub fn new(date: NaiveDate, currency: impl Into<InternedStr>, amount: Amount) -> Self {
        Self {
            date,
            currency: currency.into(),
            amount,
            meta: Metadata::new(),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} price {} {}", self.date, self.currency, self.amount)
    }
}
