//! The run-wide configuration snapshot.
//!
//! Pattern and directory tables are ordered vectors, not maps: resolution
//! appends rule lists in configuration order, and that order is observable in
//! the report.

use std::collections::HashMap;

use camino::Utf8Path;
use codefix_rules::RuleOptions;
use serde::Deserialize;
use tracing::debug;

/// One glob pattern and the rules applied to every file it matches.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PatternRules {
    pub pattern: String,
    pub rules: Vec<String>,
}

/// One directory name and the rules applied to every file under it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DirRules {
    pub dir: String,
    pub rules: Vec<String>,
}

/// Read-only during a run; built from defaults plus an optional config file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleSetConfig {
    pub patterns: Vec<PatternRules>,
    pub dir_rules: Vec<DirRules>,
    /// Per-rule options, passed verbatim to the rule's capabilities.
    pub options: HashMap<String, RuleOptions>,
    /// Directory names pruned everywhere (e.g. `.git`).
    pub exclude_dirs: Vec<String>,
    /// File basename patterns that are never validated.
    pub exclude_files: Vec<String>,
}

const BASE_RULES: &[&str] = &["utf8", "nobom", "notabs", "nocr", "notrailingws"];

/// Extensions that get exactly the base whitespace/encoding rules.
const PLAIN_TEXT_PATTERNS: &[&str] = &[
    "*.c", "*.conf", "*.cpp", "*.css", "*.groovy", "*.h", "*.htm", "*.html", "*.java", "*.js",
    "*.jsp", "*.less", "*.md", "*.phtml", "*.py", "*.rst", "*.rb", "*.sh", "*.styl", "*.txt",
    "*.vm",
];

impl Default for RuleSetConfig {
    fn default() -> Self {
        let mut patterns = Vec::new();
        let base = |extra: &[&str]| -> Vec<String> {
            BASE_RULES
                .iter()
                .chain(extra)
                .map(|s| s.to_string())
                .collect()
        };
        for pattern in PLAIN_TEXT_PATTERNS {
            patterns.push(PatternRules {
                pattern: pattern.to_string(),
                rules: base(&[]),
            });
        }
        for (pattern, extra) in [
            ("*.json", &["json"][..]),
            ("*.properties", &["ascii"]),
            ("*.sql", &["sql_semi_colon"]),
            ("*.sql_diff", &["sql_semi_colon"]),
            ("*.wsdl", &["xml"]),
            ("*.xml", &["xml", "xmlfmt"]),
            ("*.yaml", &["yaml"]),
            ("*.yml", &["yaml"]),
        ] {
            patterns.push(PatternRules {
                pattern: pattern.to_string(),
                rules: base(extra),
            });
        }
        // Spaces in file names are rejected outright.
        patterns.push(PatternRules {
            pattern: "* *".to_string(),
            rules: vec!["invalidpath".to_string()],
        });

        Self {
            patterns,
            dir_rules: vec![
                DirRules {
                    dir: "database".to_string(),
                    rules: vec!["database_dir".to_string()],
                },
                DirRules {
                    dir: "db_diffs".to_string(),
                    rules: vec!["sql_diff_dir".to_string(), "sql_diff_sql".to_string()],
                },
            ],
            options: HashMap::new(),
            exclude_dirs: vec![".git".to_string(), ".svn".to_string()],
            exclude_files: vec![".*.swp".to_string()],
        }
    }
}

impl RuleSetConfig {
    /// Options for one rule; empty map when none are configured.
    pub fn options_for(&self, rule: &str) -> RuleOptions {
        self.options.get(rule).cloned().unwrap_or_default()
    }

    /// A path is excluded when any ancestor directory name is in
    /// `exclude_dirs` or the basename matches an `exclude_files` pattern.
    pub fn is_excluded(&self, path: &Utf8Path) -> bool {
        if let Some(parent) = path.parent() {
            for component in parent.components() {
                if self
                    .exclude_dirs
                    .iter()
                    .any(|dir| dir == component.as_str())
                {
                    debug!(%path, dir = component.as_str(), "skipping excluded directory");
                    return true;
                }
            }
        }
        let Some(name) = path.file_name() else {
            return false;
        };
        for pattern in &self.exclude_files {
            match glob::Pattern::new(pattern) {
                Ok(pattern) if pattern.matches(name) => {
                    debug!(%path, %pattern, "skipping excluded file");
                    return true;
                }
                Ok(_) => {}
                Err(err) => debug!(%pattern, %err, "ignoring invalid exclude_files pattern"),
            }
        }
        false
    }
}
