//! Implementation of the padledger-check command.

use crate::cmd::completions::ShellType;
use crate::ledger::{reintern_directives, Ledger};
use crate::report;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use padledger_core::{is_sorted, sort_directives, Transaction};
use padledger_engine::{process_pads_with_options, ErrorKind, ReconcileError};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// A diagnostic message in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    /// Severity: "error" or "warning"
    pub severity: String,
    /// Error code (e.g., "E2001", "E7001")
    pub code: String,
    /// "pad", "balance", or "option"
    pub kind: String,
    /// Error message
    pub message: String,
    /// Date of the directive the diagnostic is attached to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Account the diagnostic is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Index of the directive in the input list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<usize>,
    /// Optional context information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl From<&ReconcileError> for JsonDiagnostic {
    fn from(err: &ReconcileError) -> Self {
        let kind = match err.kind() {
            ErrorKind::Pad => "pad",
            ErrorKind::Balance => "balance",
        };
        Self {
            severity: if err.code.is_warning() { "warning" } else { "error" }.to_string(),
            code: err.code.code().to_string(),
            kind: kind.to_string(),
            message: err.message.clone(),
            date: Some(err.date.to_string()),
            account: Some(err.account.to_string()),
            entry: Some(err.entry),
            context: err.context.clone(),
        }
    }
}

/// JSON output structure for all diagnostics.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// List of diagnostics
    pub diagnostics: Vec<JsonDiagnostic>,
    /// Synthesized padding transactions
    pub padding: Vec<Transaction>,
    /// Total error count
    pub error_count: usize,
    /// Total warning count
    pub warning_count: usize,
}

/// Check balance assertions and resolve pad directives in a JSON ledger.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The ledger file to check (`-` for stdin)
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    pub file: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// Show verbose output including timing and padding totals
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output (just use exit code)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the resolved ledger (with padding transactions) as JSON
    #[arg(long, value_name = "FILE")]
    pub emit: Option<PathBuf>,

    /// Print the synthesized padding transactions
    #[arg(long)]
    pub print_padding: bool,
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    let start = std::time::Instant::now();

    let file = args.file.as_ref().context("no ledger file given")?;
    let json_mode = matches!(args.format, OutputFormat::Json);

    if args.verbose {
        eprintln!("Loading {}...", file.display());
    }
    let mut ledger = Ledger::load(file)?;
    let options = ledger.options();

    let dedup_count = reintern_directives(&mut ledger.directives);
    if args.verbose {
        eprintln!("Re-interned strings ({dedup_count} deduplicated)");
    }

    if !is_sorted(&ledger.directives) {
        tracing::warn!("Directives are not in date order; sorting before checking");
        sort_directives(&mut ledger.directives);
    }

    if args.verbose {
        eprintln!("Resolving pads over {} directives...", ledger.directives.len());
    }
    let result = process_pads_with_options(&ledger.directives, &options);

    let error_count = result.error_count();
    let warning_count = options.warnings.len() + result.errors.len() - error_count;

    if let Some(path) = &args.emit {
        let resolved = Ledger {
            options: ledger.options.clone(),
            directives: result.directives.clone(),
        };
        let json = serde_json::to_string_pretty(&resolved)?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?;
        if args.verbose {
            eprintln!("Wrote {} directives to {}", resolved.directives.len(), path.display());
        }
    }

    if json_mode {
        let mut diagnostics: Vec<JsonDiagnostic> = options
            .warnings
            .iter()
            .map(|w| JsonDiagnostic {
                severity: "warning".to_string(),
                code: w.code.to_string(),
                kind: "option".to_string(),
                message: w.message.clone(),
                date: None,
                account: None,
                entry: None,
                context: Some(format!("option \"{}\" \"{}\"", w.option, w.value)),
            })
            .collect();
        diagnostics.extend(result.errors.iter().map(JsonDiagnostic::from));

        let output = JsonOutput {
            diagnostics,
            padding: result.padding_transactions,
            error_count,
            warning_count,
        };
        writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
    } else if !args.quiet {
        report::report_option_warnings(&options.warnings, &mut stdout)?;
        report::report_errors(&result.errors, &mut stdout)?;

        if args.print_padding {
            report::print_padding(&result.padding_transactions, &mut stdout)?;
        }

        if args.verbose {
            let elapsed = start.elapsed();
            writeln!(
                stdout,
                "Inserted {} padding transaction(s)",
                result.padding_transactions.len()
            )?;
            for (currency, total) in
                report::padding_totals(&result.padding_transactions, &options.operating_currency)
            {
                match total {
                    Some(total) => writeln!(stdout, "  padded {total} {currency}")?,
                    None => writeln!(stdout, "  padded {currency}: total out of range")?,
                }
            }
            writeln!(stdout, "\nChecked in {:.2}ms", elapsed.as_secs_f64() * 1000.0)?;
        }
        report::print_summary(error_count, warning_count, &mut stdout)?;
    }

    if error_count > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Main entry point for the check command.
pub fn main() -> ExitCode {
    main_with_name("padledger-check")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    // Handle shell completion generation
    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(io::stderr)
            .init();
    }

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
