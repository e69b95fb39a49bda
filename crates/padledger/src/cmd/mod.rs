//! Command implementations.
//!
//! Binaries under `src/bin` are thin wrappers around the `main` functions
//! here.

pub mod check;
pub mod completions;
