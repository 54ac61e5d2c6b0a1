//! Pattern Resolver: path → ordered rule names.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::config::RuleSetConfig;

/// Resolve the rules applying to `path`, in configuration order.
///
/// Two passes: directory rules first (a configured directory name anywhere
/// among the path's ancestors appends its list), then glob patterns matched
/// against the path as given. Duplicates are preserved; the fix stage
/// deduplicates, validation intentionally re-runs shared rules per match.
pub fn resolve(path: &Utf8Path, config: &RuleSetConfig) -> Vec<String> {
    let mut rules = Vec::new();

    let absolute = absolutize(path);
    for dir_rules in &config.dir_rules {
        let matched = absolute
            .parent()
            .is_some_and(|parent| parent.components().any(|c| c.as_str() == dir_rules.dir));
        if matched {
            debug!(%path, dir = %dir_rules.dir, "directory rules apply");
            rules.extend(dir_rules.rules.iter().cloned());
        }
    }

    for pattern_rules in &config.patterns {
        match glob::Pattern::new(&pattern_rules.pattern) {
            Ok(pattern) if pattern.matches(path.as_str()) => {
                rules.extend(pattern_rules.rules.iter().cloned());
            }
            Ok(_) => {}
            Err(err) => {
                debug!(pattern = %pattern_rules.pattern, %err, "ignoring invalid pattern");
            }
        }
    }

    rules
}

/// Directory matching considers the full path, so `schema.sql` inside a
/// checkout's `database/` directory resolves the same rules whether addressed
/// relatively or absolutely.
fn absolutize(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        return path.to_owned();
    }
    match std::env::current_dir().ok().and_then(|cwd| {
        Utf8PathBuf::from_path_buf(cwd).ok()
    }) {
        Some(cwd) => cwd.join(path),
        None => path.to_owned(),
    }
}
