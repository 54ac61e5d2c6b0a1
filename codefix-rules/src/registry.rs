use camino::Utf8Path;
use codefix_types::{CheckStatus, Details, RuleError, RuleKind};
use std::collections::BTreeMap;

/// Structured options passed verbatim to a rule's capabilities.
pub type RuleOptions = serde_json::Map<String, serde_json::Value>;

/// What a check capability sees: the file's path and its full content.
///
/// Content rules read `content`; path rules match on `path` (and may consult
/// the backing file on disk, e.g. to hand it to an external tool).
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub path: &'a Utf8Path,
    pub content: &'a [u8],
}

/// Check capability: inspect the file, optionally pushing detail records.
pub type CheckFn =
    fn(&CheckContext<'_>, &RuleOptions, &mut Details) -> Result<CheckStatus, RuleError>;

/// Fix capability: consume `src` fully, produce the corrected content into
/// `dst`. The pipeline chains `dst` into the next stage's `src`.
pub type FixFn = fn(&[u8], &mut Vec<u8>, &RuleOptions) -> Result<(), RuleError>;

/// A named unit of validation and/or fixing logic. Immutable once registered.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: &'static str,
    /// Default failure message; may embed `{option}` placeholders.
    pub message: &'static str,
    pub kind: RuleKind,
    pub check: Option<CheckFn>,
    pub fix: Option<FixFn>,
}

/// Name → rule capability table.
#[derive(Debug, Default)]
pub struct Registry {
    rules: BTreeMap<&'static str, Rule>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// All rules shipped with codefix.
    pub fn builtin() -> Self {
        let mut reg = Self::empty();
        for rule in builtin_rules() {
            reg.register(rule);
        }
        reg
    }

    /// A rule name always resolves to at most one definition; registering the
    /// same name twice replaces the earlier entry.
    pub fn register(&mut self, rule: Rule) {
        self.rules.insert(rule.name, rule);
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }
}

fn builtin_rules() -> Vec<Rule> {
    use RuleKind::{Content, Path};

    vec![
        Rule {
            name: "invalidpath",
            message: "has invalid file path (file name or extension is not allowed)",
            kind: Content,
            check: Some(crate::text::check_invalidpath),
            fix: None,
        },
        Rule {
            name: "utf8",
            message: "is not UTF-8 encoded",
            kind: Content,
            check: Some(crate::encoding::check_utf8),
            fix: None,
        },
        Rule {
            name: "ascii",
            message: "is not ASCII encoded",
            kind: Content,
            check: Some(crate::encoding::check_ascii),
            fix: None,
        },
        Rule {
            name: "nobom",
            message: "has UTF-8 byte order mark (BOM)",
            kind: Content,
            check: Some(crate::encoding::check_nobom),
            fix: None,
        },
        Rule {
            name: "notabs",
            message: "contains tabs",
            kind: Content,
            check: Some(crate::text::check_notabs),
            fix: Some(crate::text::fix_notabs),
        },
        Rule {
            name: "nocr",
            message: "contains carriage return (CR)",
            kind: Content,
            check: Some(crate::text::check_nocr),
            fix: Some(crate::text::fix_nocr),
        },
        Rule {
            name: "notrailingws",
            message: "contains lines with trailing whitespace",
            kind: Content,
            check: Some(crate::text::check_notrailingws),
            fix: Some(crate::text::fix_notrailingws),
        },
        Rule {
            name: "indent4",
            message: "contains invalid indentation (not 4 spaces)",
            kind: Content,
            check: Some(crate::text::check_indent4),
            fix: None,
        },
        Rule {
            name: "xml",
            message: "is not valid XML",
            kind: Content,
            check: Some(crate::markup::check_xml),
            fix: None,
        },
        Rule {
            name: "xmlfmt",
            message: "is not well-formatted (pretty-printed) XML",
            kind: Content,
            check: Some(crate::markup::check_xmlfmt),
            fix: Some(crate::markup::fix_xmlfmt),
        },
        Rule {
            name: "json",
            message: "is not valid JSON",
            kind: Content,
            check: Some(crate::markup::check_json),
            fix: None,
        },
        Rule {
            name: "yaml",
            message: "is not valid YAML",
            kind: Content,
            check: Some(crate::markup::check_yaml),
            fix: None,
        },
        Rule {
            name: "sql_semi_colon",
            message: "SQL file ends without a semicolon",
            kind: Content,
            check: Some(crate::sql::check_sql_semi_colon),
            fix: Some(crate::sql::fix_sql_semi_colon),
        },
        Rule {
            name: "database_dir",
            message: "contains syntax errors",
            kind: Path,
            check: Some(crate::dirs::check_database_dir),
            fix: None,
        },
        Rule {
            name: "sql_diff_dir",
            message: "violates migration directory layout",
            kind: Path,
            check: Some(crate::dirs::check_sql_diff_dir),
            fix: None,
        },
        Rule {
            name: "sql_diff_sql",
            message: "violates migration SQL conventions",
            kind: Path,
            check: Some(crate::dirs::check_sql_diff_sql),
            fix: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_the_core_rules() {
        let reg = Registry::builtin();
        for name in [
            "utf8",
            "nobom",
            "notabs",
            "nocr",
            "notrailingws",
            "xml",
            "xmlfmt",
            "json",
            "yaml",
            "sql_semi_colon",
            "database_dir",
        ] {
            assert!(reg.get(name).is_some(), "missing builtin rule {name}");
        }
        assert!(reg.get("nonexistent").is_none());
    }

    #[test]
    fn capability_presence_matches_the_rule() {
        let reg = Registry::builtin();

        let notabs = reg.get("notabs").unwrap();
        assert!(notabs.check.is_some());
        assert!(notabs.fix.is_some());

        // Advisory-only: check but no fix.
        let utf8 = reg.get("utf8").unwrap();
        assert!(utf8.check.is_some());
        assert!(utf8.fix.is_none());
    }

    #[test]
    fn register_replaces_by_name() {
        let mut reg = Registry::builtin();
        let before = reg.names().count();
        reg.register(Rule {
            name: "notabs",
            message: "different message",
            kind: codefix_types::RuleKind::Content,
            check: None,
            fix: None,
        });
        assert_eq!(reg.names().count(), before);
        assert_eq!(reg.get("notabs").unwrap().message, "different message");
    }
}
