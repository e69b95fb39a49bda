//! Text reporting of diagnostics and padding.

use padledger_core::Transaction;
use padledger_engine::{OptionWarning, ReconcileError};
use rust_decimal::Decimal;
use std::io::Write;

/// Report pad and balance diagnostics to the given writer.
pub fn report_errors<W: Write>(errors: &[ReconcileError], writer: &mut W) -> std::io::Result<()> {
    for error in errors {
        let label = if error.code.is_warning() { "warning" } else { "error" };
        writeln!(
            writer,
            "{label}[{}]: {} ({})",
            error.code.code(),
            error.message,
            error.date
        )?;
        if let Some(ctx) = &error.context {
            writeln!(writer, "  context: {ctx}")?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Report option warnings (E7001, E7002, E7003).
pub fn report_option_warnings<W: Write>(
    warnings: &[OptionWarning],
    writer: &mut W,
) -> std::io::Result<()> {
    for warning in warnings {
        writeln!(writer, "warning[{}]: {}", warning.code, warning.message)?;
    }
    Ok(())
}

/// Print synthesized padding transactions.
pub fn print_padding<W: Write>(transactions: &[Transaction], writer: &mut W) -> std::io::Result<()> {
    for txn in transactions {
        writeln!(writer, "{txn}")?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Net amount padded into target accounts, per currency in `currencies`.
///
/// A total that does not fit in a decimal is `None`.
pub fn padding_totals(
    transactions: &[Transaction],
    currencies: &[String],
) -> Vec<(String, Option<Decimal>)> {
    currencies
        .iter()
        .map(|currency| {
            let total = transactions
                .iter()
                .filter_map(|txn| txn.postings.first())
                .filter(|p| p.units.currency == *currency)
                .try_fold(Decimal::ZERO, |total, p| total.checked_add(p.units.number));
            (currency.clone(), total)
        })
        .collect()
}

/// Print a summary of errors and warnings.
pub fn print_summary<W: Write>(
    errors: usize,
    warnings: usize,
    writer: &mut W,
) -> std::io::Result<()> {
    if errors == 0 && warnings == 0 {
        writeln!(writer, "\x1b[32m\u{2713}\x1b[0m No errors found")?;
        return Ok(());
    }

    let error_text = if errors == 1 { "error" } else { "errors" };
    let warning_text = if warnings == 1 { "warning" } else { "warnings" };
    match (errors, warnings) {
        (0, _) => writeln!(writer, "\x1b[33m\u{26A0}\x1b[0m {warnings} {warning_text}"),
        (_, 0) => writeln!(writer, "\x1b[31m\u{2717}\x1b[0m {errors} {error_text}"),
        _ => writeln!(
            writer,
            "\x1b[31m\u{2717}\x1b[0m {errors} {error_text}, {warnings} {warning_text}"
        ),
    }
}
