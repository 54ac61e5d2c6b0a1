//! Property tests: the formatting fixers are idempotent — content that has
//! been fixed once is a fixed point of the pipeline.

use camino::Utf8Path;
use codefix_engine::{FixSettings, MemFileStore, RuleSetConfig, Session, Validator, fix_file};
use codefix_rules::Registry;
use proptest::prelude::*;

const WHITESPACE_RULES: &[&str] = &["notabs", "nocr", "notrailingws"];

fn fixed_content(content: &[u8], rules: &[&str]) -> Option<Vec<u8>> {
    let store = MemFileStore::with_file("input.txt", content.to_vec());
    let outcome = fix_file(
        &store,
        Utf8Path::new("input.txt"),
        &rules.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        &Registry::builtin(),
        &RuleSetConfig::default(),
        &FixSettings::without_backup(),
    )
    .unwrap();
    outcome
        .is_applied()
        .then(|| store.get(Utf8Path::new("input.txt")).unwrap())
}

proptest! {
    #[test]
    fn whitespace_fixes_are_idempotent(content in proptest::collection::vec(any::<u8>(), 0..512)) {
        if let Some(once) = fixed_content(&content, WHITESPACE_RULES) {
            let twice = fixed_content(&once, WHITESPACE_RULES)
                .expect("fixed content must fix again");
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn fixed_whitespace_content_validates_clean(
        content in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        if let Some(fixed) = fixed_content(&content, WHITESPACE_RULES) {
            let registry = Registry::builtin();
            let config = RuleSetConfig::default();
            let validator = Validator::new(&registry, &config);
            let mut session = Session::new();
            let rules: Vec<String> = WHITESPACE_RULES.iter().map(|s| s.to_string()).collect();
            validator.validate_with_rules(Utf8Path::new("input.txt"), &fixed, &rules, &mut session);
            prop_assert!(!session.has_failures(), "violations: {:?}", session.violations());
        }
    }

    #[test]
    fn failed_fix_never_rewrites(content in proptest::collection::vec(any::<u8>(), 0..64)) {
        let store = MemFileStore::with_file("input.txt", content.clone());
        let rules = vec!["notrailingws".to_string()];
        let outcome = fix_file(
            &store,
            Utf8Path::new("input.txt"),
            &rules,
            &Registry::builtin(),
            &RuleSetConfig::default(),
            &FixSettings::without_backup(),
        ).unwrap();
        if !outcome.is_applied() {
            prop_assert_eq!(store.get(Utf8Path::new("input.txt")).unwrap(), content);
        }
    }
}

/// Well-formed XML documents: nested elements with optional text and a
/// single-attribute variant, no entities or processing instructions.
fn xml_document() -> impl Strategy<Value = String> {
    let name = "[a-z][a-z0-9]{0,5}";
    let text = "[a-zA-Z0-9][a-zA-Z0-9 .,]{0,15}";
    let leaf = (name, proptest::option::of(text)).prop_map(|(n, t)| match t {
        Some(t) => format!("<{n}>{t}</{n}>"),
        None => format!("<{n}/>"),
    });
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            "[a-z][a-z0-9]{0,5}",
            proptest::option::of(("[a-z]{1,4}", "[a-zA-Z0-9]{0,8}")),
            proptest::collection::vec(inner, 1..4),
        )
            .prop_map(|(n, attr, children)| {
                let attrs = attr
                    .map(|(k, v)| format!(" {k}=\"{v}\""))
                    .unwrap_or_default();
                format!("<{n}{attrs}>{}</{n}>", children.concat())
            })
    })
}

proptest! {
    #[test]
    fn xmlfmt_fix_is_idempotent(doc in xml_document()) {
        let once = fixed_content(doc.as_bytes(), &["xmlfmt"])
            .expect("well-formed input must format");
        let twice = fixed_content(&once, &["xmlfmt"])
            .expect("formatted output must format again");
        prop_assert_eq!(&once, &twice);

        // Formatted output is its own pretty-printed form, so it checks clean.
        let registry = Registry::builtin();
        let config = RuleSetConfig::default();
        let validator = Validator::new(&registry, &config);
        let mut session = Session::new();
        validator.validate_with_rules(
            Utf8Path::new("input.xml"),
            &once,
            &["xmlfmt".to_string()],
            &mut session,
        );
        prop_assert!(!session.has_failures(), "violations: {:?}", session.violations());
    }
}

#[test]
fn sql_semicolon_fix_is_not_run_twice_blindly() {
    // The fixer always appends; idempotence holds at the check level: content
    // that already passes is never queued for fixing by the session.
    let registry = Registry::builtin();
    let config = RuleSetConfig::default();
    let validator = Validator::new(&registry, &config);
    let mut session = Session::new();
    validator.validate_with_rules(
        Utf8Path::new("q.sql"),
        b"SELECT 1;\n",
        &["sql_semi_colon".to_string()],
        &mut session,
    );
    assert!(!session.has_failures());
    assert!(session.rules_by_file().is_empty());
}
