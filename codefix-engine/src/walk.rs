//! Recursive directory traversal for batch validation.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::RuleSetConfig;

/// Collect the files to validate under `root`, in sorted traversal order.
///
/// Excluded directory names are pruned from the walk, excluded basenames are
/// skipped. `exclude` and `include` are caller glob patterns, interpreted
/// relative to `root`: with exclude patterns present, a file is taken unless
/// it matches an exclude and no include; with only include patterns, a file
/// must match one; with neither, everything is taken.
pub fn collect_files(
    root: &Utf8Path,
    config: &RuleSetConfig,
    exclude: &[String],
    include: &[String],
) -> Vec<Utf8PathBuf> {
    let exclude = compile_patterns(root, exclude);
    let include = compile_patterns(root, include);

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(entry.file_type().is_dir() && config.exclude_dirs.iter().any(|dir| *dir == name))
        });
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(%err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
            debug!("skipping non-UTF-8 path");
            continue;
        };
        if path
            .file_name()
            .is_some_and(|name| matches_any_basename(&config.exclude_files, name))
        {
            continue;
        }

        let excluded = exclude.iter().any(|p| p.matches(path.as_str()));
        let included = include.iter().any(|p| p.matches(path.as_str()));
        let take = if !exclude.is_empty() {
            !excluded || included
        } else {
            included || include.is_empty()
        };
        if take {
            files.push(path);
        }
    }
    files
}

fn compile_patterns(root: &Utf8Path, patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|pattern| {
            let joined = root.join(pattern);
            match glob::Pattern::new(joined.as_str()) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    debug!(%pattern, %err, "ignoring invalid pattern");
                    None
                }
            }
        })
        .collect()
}

fn matches_any_basename(patterns: &[String], name: &str) -> bool {
    patterns
        .iter()
        .filter_map(|p| glob::Pattern::new(p).ok())
        .any(|p| p.matches(name))
}
