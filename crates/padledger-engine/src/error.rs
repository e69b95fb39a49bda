//! Diagnostics produced while resolving pads and balance assertions.
//!
//! | Code | Kind | Description |
//! |------|------|-------------|
//! | E2001 | balance | Balance assertion failed |
//! | E2003 | pad | Pad never used by a balance assertion (warning) |
//! | E2004 | pad | Pad superseded by a later pad before it was used |
//! | E2005 | pad | Shortfall held at cost cannot be padded |

use chrono::NaiveDate;
use padledger_core::InternedStr;
use serde::Serialize;
use thiserror::Error;

/// Diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// E2001: Balance assertion failed.
    BalanceAssertionFailed,
    /// E2003: Pad directive never used by a balance assertion.
    UnusedPad,
    /// E2004: Pad superseded by a later pad before it was used.
    RedundantPad,
    /// E2005: The shortfall involves lots held at cost.
    PadWithCost,
}

impl ErrorCode {
    /// Get the code string (e.g., "E2001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BalanceAssertionFailed => "E2001",
            Self::UnusedPad => "E2003",
            Self::RedundantPad => "E2004",
            Self::PadWithCost => "E2005",
        }
    }

    /// Which directive the diagnostic is about.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BalanceAssertionFailed => ErrorKind::Balance,
            Self::UnusedPad | Self::RedundantPad | Self::PadWithCost => ErrorKind::Pad,
        }
    }

    /// Check if this is a warning (not an error).
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::UnusedPad)
    }

    /// Get the severity level.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        if self.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The directive type a diagnostic is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// A pad directive was misused.
    Pad,
    /// A balance assertion does not hold.
    Balance,
}

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// Ledger is invalid.
    Error,
    /// Suspicious but valid.
    Warning,
}

/// A diagnostic from the pad and balance pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct ReconcileError {
    /// Error code.
    pub code: ErrorCode,
    /// Error message.
    pub message: String,
    /// Date of the directive the error is about.
    pub date: NaiveDate,
    /// Account of the directive the error is about.
    pub account: InternedStr,
    /// Position of that directive in the input list.
    pub entry: usize,
    /// Additional context.
    pub context: Option<String>,
}

impl ReconcileError {
    /// Create a new diagnostic.
    #[must_use]
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        date: NaiveDate,
        account: impl Into<InternedStr>,
        entry: usize,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            date,
            account: account.into(),
            entry,
            context: None,
        }
    }

    /// Add context to this diagnostic.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Shorthand for `self.code.kind()`.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    /// Shorthand for `self.code.severity()`.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.code.severity()
    }
}
