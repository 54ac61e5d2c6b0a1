//! Builtin rules and the capability registry.
//!
//! A rule is a named pair of optional capabilities: a *check* that inspects a
//! file and a *fix* that rewrites it. The registry is an explicit name → rule
//! table; adding a rule means adding an entry to [`Registry::builtin`], not
//! reflection tricks.
//!
//! Rules that only shell out to third-party linters/formatters are out of
//! scope here; `database_dir` demonstrates the external-process boundary.

mod dirs;
mod encoding;
mod markup;
mod registry;
mod sql;
mod text;

pub use registry::{CheckContext, CheckFn, FixFn, Registry, Rule, RuleOptions};
