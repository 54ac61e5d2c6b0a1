//! The codefix core: configuration snapshot, rule resolution, validation
//! dispatch, the diagnostic session and the atomic fix pipeline.
//!
//! All I/O goes through the [`ports::FileStore`] trait so the same dispatch
//! and fix code runs against the filesystem and against the in-memory store
//! used by filter mode and tests.

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod pipeline;
pub mod ports;
pub mod resolve;
pub mod session;
pub mod walk;

pub use adapters::{FsFileStore, MemFileStore};
pub use config::{DirRules, PatternRules, RuleSetConfig};
pub use dispatch::Validator;
pub use pipeline::{FixSettings, fix_file};
pub use ports::FileStore;
pub use resolve::resolve;
pub use session::Session;
pub use walk::collect_files;
