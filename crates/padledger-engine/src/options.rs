//! Ledger options that affect pad and balance resolution.

use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Option names this pass understands.
const KNOWN_OPTIONS: &[&str] = &["title", "operating_currency", "inferred_tolerance_default"];

/// Options that can be specified multiple times.
const REPEATABLE_OPTIONS: &[&str] = &["operating_currency", "inferred_tolerance_default"];

/// Key of the wildcard entry in `inferred_tolerance_default`.
pub const ANY_CURRENCY: &str = "*";

/// Option validation warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionWarning {
    /// Warning code (E7001, E7002, E7003).
    pub code: &'static str,
    /// Warning message.
    pub message: String,
    /// Option name.
    pub option: String,
    /// Option value.
    pub value: String,
}

impl OptionWarning {
    fn new(code: &'static str, message: String, key: &str, value: &str) -> Self {
        Self {
            code,
            message,
            option: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Ledger options, as set by `option` directives.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Title for the ledger.
    pub title: Option<String>,

    /// Operating currencies, in declaration order.
    pub operating_currency: Vec<String>,

    /// Balance tolerance per currency; the `*` key applies to all others.
    pub inferred_tolerance_default: HashMap<String, Decimal>,

    /// Options that have been set (for duplicate detection).
    #[doc(hidden)]
    pub set_options: HashSet<String>,

    /// Validation warnings collected while setting options.
    pub warnings: Vec<OptionWarning>,
}

impl Options {
    /// Create options with defaults: exact balance checks, no operating currency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option by name.
    ///
    /// Validates the option and collects any warnings in `self.warnings`.
    pub fn set(&mut self, key: &str, value: &str) {
        let is_known = KNOWN_OPTIONS.contains(&key);
        if !is_known {
            self.warnings.push(OptionWarning::new(
                "E7001",
                format!("Unknown option \"{key}\""),
                key,
                value,
            ));
            return;
        }

        let is_repeatable = REPEATABLE_OPTIONS.contains(&key);
        if !is_repeatable && self.set_options.contains(key) {
            self.warnings.push(OptionWarning::new(
                "E7003",
                format!("Option \"{key}\" can only be specified once"),
                key,
                value,
            ));
        }
        self.set_options.insert(key.to_string());

        match key {
            "title" => self.title = Some(value.to_string()),
            "operating_currency" => self.operating_currency.push(value.to_string()),
            "inferred_tolerance_default" => match value.split_once(':') {
                Some((currency, tol)) => match Decimal::from_str(tol.trim()) {
                    Ok(d) if d >= Decimal::ZERO => {
                        self.inferred_tolerance_default
                            .insert(currency.trim().to_string(), d);
                    }
                    _ => self.warnings.push(OptionWarning::new(
                        "E7002",
                        format!("Invalid tolerance value \"{tol}\" in option \"{key}\""),
                        key,
                        value,
                    )),
                },
                None => self.warnings.push(OptionWarning::new(
                    "E7002",
                    format!("Invalid format for option \"{key}\": expected CURRENCY:TOLERANCE"),
                    key,
                    value,
                )),
            },
            _ => {}
        }
    }

    /// Default tolerance for balance assertions in `currency`.
    ///
    /// Falls back to the `*` entry, then to zero (exact match).
    #[must_use]
    pub fn tolerance_for(&self, currency: &str) -> Decimal {
        self.inferred_tolerance_default
            .get(currency)
            .or_else(|| self.inferred_tolerance_default.get(ANY_CURRENCY))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
