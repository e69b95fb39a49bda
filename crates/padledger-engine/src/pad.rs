//! Pad resolution.
//!
//! A `pad` directive lets the next failing `balance` assertion on its account
//! be fixed by a synthesized transaction that moves the difference from the
//! pad's source account:
//!
//! ```beancount
//! 2013-05-01 pad Assets:Checking Equity:Opening-Balances
//! 2013-05-03 balance Assets:Checking 172.45 USD
//! ```
//!
//! resolves to
//!
//! ```beancount
//! 2013-05-01 P "(Padding inserted for Balance of 172.45 USD for difference 172.45 USD)"
//!   Assets:Checking           172.45 USD
//!   Equity:Opening-Balances  -172.45 USD
//! ```
//!
//! Accounts are resolved one at a time. Each account walk keeps its own
//! inventories and pad state, and the transactions it synthesizes are spliced
//! into the working list right after their pad before the next account is
//! walked.

use chrono::NaiveDate;
use padledger_core::{
    AddOutcome, Amount, Balance, Directive, InternedStr, Inventory, LotChange, Pad, Posting,
    Transaction, PADDING_FLAG,
};
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::account::{depth, AccountIndex};
use crate::error::{ErrorCode, ReconcileError};
use crate::options::Options;
use crate::walk::{walk_account, WalkItem};

/// Result of resolving pads.
#[derive(Debug, Clone)]
pub struct PadResult {
    /// Input directives in their original order, with each synthesized
    /// transaction placed right after the pad it came from.
    pub directives: Vec<Directive>,
    /// Synthesized transactions, in creation order.
    pub padding_transactions: Vec<Transaction>,
    /// Pad and balance diagnostics.
    pub errors: Vec<ReconcileError>,
}

impl PadResult {
    /// Check if any diagnostic has error severity.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| !e.code.is_warning())
    }

    /// Number of diagnostics with error severity.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.iter().filter(|e| !e.code.is_warning()).count()
    }

    /// The resolved directives without the pad directives themselves.
    #[must_use]
    pub fn expanded(&self) -> Vec<Directive> {
        self.directives
            .iter()
            .filter(|d| !matches!(d, Directive::Pad(_)))
            .cloned()
            .collect()
    }
}

/// Narration of a synthesized transaction.
#[must_use]
pub fn padding_narration(asserted: &Amount, difference: &Amount) -> String {
    format!("(Padding inserted for Balance of {asserted} for difference {difference})")
}

/// Resolve pads with default options (exact balance checks).
pub fn process_pads(directives: &[Directive]) -> PadResult {
    process_pads_with_options(directives, &Options::default())
}

/// Resolve every pad and check every balance assertion.
///
/// `directives` must be date-ordered (see [`padledger_core::sort_directives`]).
/// Nothing in the input is modified; the result holds a new list.
pub fn process_pads_with_options(directives: &[Directive], options: &Options) -> PadResult {
    let index = AccountIndex::from_directives(directives);
    let mut working: Vec<Directive> = directives.to_vec();
    let mut origins: Vec<Option<usize>> = (0..directives.len()).map(Some).collect();
    let mut padding_transactions = Vec::new();
    let mut errors = Vec::new();

    for account in resolution_order(directives) {
        let resolution = AccountResolver::new(&account, &index, options).run(&working);

        tracing::debug!(
            "Resolved {}: {} padding transaction(s), {} diagnostic(s)",
            account,
            resolution.inserts.len(),
            resolution.errors.len()
        );

        errors.extend(resolution.errors.into_iter().map(|mut err| {
            err.entry = origins.get(err.entry).copied().flatten().unwrap_or(err.entry);
            err
        }));

        if !resolution.inserts.is_empty() {
            padding_transactions.extend(resolution.inserts.iter().map(|(_, txn)| txn.clone()));
            splice_after_pads(&mut working, &mut origins, resolution.inserts);
        }
    }

    errors.sort_by_key(|e| (e.date, e.entry));

    PadResult {
        directives: working,
        padding_transactions,
        errors,
    }
}

/// Accounts named by a pad or balance, in the order they are resolved.
///
/// Deeper accounts go before their ancestors so a parent's assertion sees its
/// children's padding. Pad sources go last so they see every padding posting
/// taken from them.
fn resolution_order(directives: &[Directive]) -> Vec<InternedStr> {
    let mut targets: HashSet<InternedStr> = HashSet::new();
    let mut sources: HashSet<InternedStr> = HashSet::new();
    for directive in directives {
        match directive {
            Directive::Pad(pad) => {
                targets.insert(pad.account.clone());
                sources.insert(pad.source_account.clone());
            }
            Directive::Balance(balance) => {
                targets.insert(balance.account.clone());
            }
            _ => {}
        }
    }

    let mut order: Vec<InternedStr> = targets.into_iter().collect();
    order.sort_by(|a, b| {
        let key = |account: &InternedStr| (sources.contains(account), Reverse(depth(account)));
        key(a).cmp(&key(b)).then_with(|| a.cmp(b))
    });
    order
}

/// Insert each synthesized transaction right after the directive at its key.
///
/// Transactions sharing a key keep their creation order.
fn splice_after_pads(
    working: &mut Vec<Directive>,
    origins: &mut Vec<Option<usize>>,
    mut inserts: Vec<(usize, Transaction)>,
) {
    inserts.sort_by_key(|(after, _)| *after);
    let mut pending = inserts.into_iter().peekable();

    let old = std::mem::take(working);
    let old_origins = std::mem::take(origins);
    working.reserve(old.len() + pending.len());
    origins.reserve(old.len() + pending.len());

    for (i, (directive, origin)) in old.into_iter().zip(old_origins).enumerate() {
        working.push(directive);
        origins.push(origin);
        while let Some((_, txn)) = pending.next_if(|(after, _)| *after == i) {
            working.push(Directive::Transaction(txn));
            origins.push(None);
        }
    }
}

/// The pad currently governing an account.
#[derive(Debug)]
struct ActivePad<'a> {
    /// Position of the pad in the working list.
    index: usize,
    pad: &'a Pad,
    /// Currencies this pad already corrected (or refused to correct).
    padded: HashSet<InternedStr>,
    /// Date of the first balance assertion the pad was consumed by.
    consumed_on: Option<NaiveDate>,
}

impl ActivePad<'_> {
    fn is_used(&self) -> bool {
        !self.padded.is_empty()
    }

    /// A pad covers one balance date; within that date each currency once.
    fn can_cover(&self, currency: &str, date: NaiveDate) -> bool {
        !self.padded.contains(currency) && self.consumed_on.map_or(true, |d| d == date)
    }

    fn consume(&mut self, currency: &InternedStr, date: NaiveDate) {
        self.padded.insert(currency.clone());
        self.consumed_on.get_or_insert(date);
    }
}

/// Pad state of the account being resolved.
#[derive(Debug)]
enum PadState<'a> {
    Idle,
    Active(ActivePad<'a>),
}

/// Output of one account walk.
struct Resolution {
    /// Synthesized transactions keyed by the working-list position of their pad.
    inserts: Vec<(usize, Transaction)>,
    /// Diagnostics; `entry` still refers to the working list.
    errors: Vec<ReconcileError>,
}

/// Single forward scan over one account's walk.
struct AccountResolver<'i> {
    account: InternedStr,
    index: &'i AccountIndex,
    options: &'i Options,
    inventories: HashMap<InternedStr, Inventory>,
    /// Currencies whose holdings stopped fitting in a decimal.
    overflowed: HashSet<InternedStr>,
    inserts: Vec<(usize, Transaction)>,
    errors: Vec<ReconcileError>,
}

impl<'i> AccountResolver<'i> {
    fn new(account: &InternedStr, index: &'i AccountIndex, options: &'i Options) -> Self {
        Self {
            account: account.clone(),
            index,
            options,
            inventories: HashMap::new(),
            overflowed: HashSet::new(),
            inserts: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(mut self, working: &[Directive]) -> Resolution {
        let mut state = PadState::Idle;

        for item in walk_account(working, &self.account) {
            match item {
                WalkItem::Open { open, .. } => {
                    self.inventories.entry(open.account.clone()).or_default();
                }
                WalkItem::Posting {
                    transaction,
                    posting,
                    ..
                } => self.on_posting(&mut state, transaction, posting),
                WalkItem::Pad { index, pad } => self.on_pad(&mut state, index, pad),
                WalkItem::Balance { index, balance } => {
                    self.on_balance(&mut state, index, balance);
                }
            }
        }

        if let PadState::Active(active) = &state {
            if !active.is_used() {
                self.errors.push(
                    ReconcileError::new(
                        ErrorCode::UnusedPad,
                        format!("Unused Pad entry for {}", active.pad.account),
                        active.pad.date,
                        active.pad.account.clone(),
                        active.index,
                    )
                    .with_context(active.pad.to_string()),
                );
            }
        }

        Resolution {
            inserts: self.inserts,
            errors: self.errors,
        }
    }

    /// Fold a posting into its account's inventory.
    fn book(&mut self, posting: &Posting, date: NaiveDate) -> AddOutcome {
        let outcome = self
            .inventories
            .entry(posting.account.clone())
            .or_default()
            .add_position(posting.position());
        if outcome.change == LotChange::Overflow {
            tracing::warn!(
                "Holdings of {} in {} out of range on {}; posting of {} not applied",
                posting.units.currency,
                posting.account,
                date,
                posting.units
            );
            self.overflowed.insert(posting.units.currency.clone());
        }
        outcome
    }

    fn on_posting(&mut self, state: &mut PadState<'_>, transaction: &Transaction, posting: &Posting) {
        let outcome = self.book(posting, transaction.date);
        if outcome.negative_at_cost {
            tracing::warn!(
                "Lot held at cost went negative in {} on {}: {}",
                posting.account,
                transaction.date,
                outcome.position
            );
        }

        // Padding already present in the input counts as this pad's
        // correction for that currency.
        if let PadState::Active(active) = state {
            if transaction.is_padding()
                && transaction.date == active.pad.date
                && posting.account == active.pad.account
                && transaction
                    .postings
                    .iter()
                    .any(|p| p.account == active.pad.source_account)
            {
                active.padded.insert(posting.units.currency.clone());
            }
        }
    }

    fn on_pad<'a>(&mut self, state: &mut PadState<'a>, index: usize, pad: &'a Pad) {
        if let PadState::Active(previous) = state {
            if !previous.is_used() {
                self.errors.push(
                    ReconcileError::new(
                        ErrorCode::RedundantPad,
                        format!(
                            "Redundant Pad entry for {}: superseded by the pad on {}",
                            previous.pad.account, pad.date
                        ),
                        previous.pad.date,
                        previous.pad.account.clone(),
                        previous.index,
                    )
                    .with_context(previous.pad.to_string()),
                );
            }
        }
        *state = PadState::Active(ActivePad {
            index,
            pad,
            padded: HashSet::new(),
            consumed_on: None,
        });
    }

    fn on_balance(&mut self, state: &mut PadState<'_>, index: usize, balance: &Balance) {
        let currency = &balance.amount.currency;
        let family = if self.overflowed.contains(currency.as_str()) {
            None
        } else {
            self.index
                .aggregate_inventory(&self.account, balance.date, &self.inventories)
        };
        let Some((family, actual, diff)) = family.and_then(|family| {
            let actual = family.checked_units(currency)?;
            let diff = balance.amount.number.checked_sub(actual)?;
            Some((family, actual, diff))
        }) else {
            self.errors.push(balance_out_of_range(index, balance));
            return;
        };
        let tolerance = balance
            .tolerance
            .unwrap_or_else(|| self.options.tolerance_for(currency));

        if diff.abs() <= tolerance {
            // Seen again on a rerun: the padding in the input satisfied this
            // assertion, so the pad is spent for later dates.
            if let PadState::Active(active) = state {
                if active.padded.contains(currency.as_str()) && active.consumed_on.is_none() {
                    active.consumed_on = Some(balance.date);
                }
            }
            return;
        }

        let active = match state {
            PadState::Active(active) if active.can_cover(currency, balance.date) => active,
            _ => {
                self.errors.push(balance_failed(index, balance, actual, diff));
                return;
            }
        };
        active.consume(currency, balance.date);

        if family.has_cost_lots(currency) {
            self.errors.push(
                ReconcileError::new(
                    ErrorCode::PadWithCost,
                    format!("Attempt to pad an entry with cost for {}", balance.account),
                    active.pad.date,
                    active.pad.account.clone(),
                    active.index,
                )
                .with_context(balance.to_string()),
            );
            return;
        }

        let difference = Amount::new(diff, currency.clone());
        let txn = Transaction::new(
            active.pad.date,
            padding_narration(&balance.amount, &difference.abs()),
        )
        .with_flag(PADDING_FLAG)
        .with_meta(active.pad.meta.clone())
        .with_posting(Posting::new(active.pad.account.clone(), difference.clone()))
        .with_posting(Posting::new(active.pad.source_account.clone(), -&difference));

        tracing::debug!(
            "Padding {} with {} from {} for balance on {}",
            active.pad.account,
            difference,
            active.pad.source_account,
            balance.date
        );

        let pad_index = active.index;
        for posting in &txn.postings {
            self.book(posting, txn.date);
        }
        self.inserts.push((pad_index, txn));
    }
}

fn balance_out_of_range(index: usize, balance: &Balance) -> ReconcileError {
    ReconcileError::new(
        ErrorCode::BalanceAssertionFailed,
        format!(
            "Balance assertion failed for {}: expected {}, holdings of {} are out of range",
            balance.account, balance.amount, balance.amount.currency
        ),
        balance.date,
        balance.account.clone(),
        index,
    )
    .with_context(balance.to_string())
}

fn balance_failed(index: usize, balance: &Balance, actual: Decimal, diff: Decimal) -> ReconcileError {
    let direction = if diff > Decimal::ZERO { "too little" } else { "too much" };
    ReconcileError::new(
        ErrorCode::BalanceAssertionFailed,
        format!(
            "Balance assertion failed for {}: expected {}, got {} {} ({} {})",
            balance.account,
            balance.amount,
            actual,
            balance.amount.currency,
            diff.abs(),
            direction
        ),
        balance.date,
        balance.account.clone(),
        index,
    )
    .with_context(balance.to_string())
}
