//! Shared vocabulary types for codefix: rule identity, check outcomes,
//! per-invocation diagnostics, and the rule-level error taxonomy.
//!
//! This crate owns the *words* the engine and the rule implementations use to
//! talk to each other; it has no I/O and no behavior of its own.

mod detail;
mod error;
mod outcome;

pub use detail::{Detail, Details};
pub use error::RuleError;
pub use outcome::{CheckStatus, FixOutcome, RuleKind, Violation};
