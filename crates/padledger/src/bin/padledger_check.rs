//! padledger-check - Check balance assertions and resolve pads.
//!
//! Primary binary for validating a JSON ledger.

fn main() -> std::process::ExitCode {
    padledger::cmd::check::main()
}
