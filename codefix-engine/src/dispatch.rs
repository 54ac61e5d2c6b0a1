//! Validation Dispatcher: run every resolved rule against one file.

use camino::Utf8Path;
use codefix_rules::{CheckContext, Registry, RuleOptions};
use codefix_types::{CheckStatus, RuleError, RuleKind};
use tracing::debug;

use crate::config::RuleSetConfig;
use crate::ports::FileStore;
use crate::resolve::resolve;
use crate::session::Session;

/// Runs checks and records the outcomes into a [`Session`].
///
/// Validation is best-effort: a rule failing, erroring or missing never
/// aborts the run. Only a failed content read is fatal for the file.
pub struct Validator<'a> {
    registry: &'a Registry,
    config: &'a RuleSetConfig,
    filter_mode: bool,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a Registry, config: &'a RuleSetConfig) -> Self {
        Self {
            registry,
            config,
            filter_mode: false,
        }
    }

    /// In filter mode the path is virtual (content comes from stdin), so
    /// rules that inspect the backing file are skipped.
    pub fn filter_mode(mut self, filter_mode: bool) -> Self {
        self.filter_mode = filter_mode;
        self
    }

    /// Resolve and run all rules for one file.
    pub fn validate_file(
        &self,
        store: &dyn FileStore,
        path: &Utf8Path,
        session: &mut Session,
    ) -> anyhow::Result<()> {
        if self.config.is_excluded(path) {
            return Ok(());
        }
        let rules = resolve(path, self.config);
        if rules.is_empty() {
            debug!(%path, "no rules resolved");
            return Ok(());
        }
        let content = store.read(path)?;
        self.validate_with_rules(path, &content, &rules, session);
        Ok(())
    }

    /// Run an explicit rule list against already-read content.
    pub fn validate_with_rules(
        &self,
        path: &Utf8Path,
        content: &[u8],
        rules: &[String],
        session: &mut Session,
    ) {
        for name in rules {
            debug!(%path, rule = %name, "validating");
            let Some(rule) = self.registry.get(name) else {
                session.notice(format!("{name} does not exist"));
                continue;
            };
            let Some(check) = rule.check else {
                session.notice(format!("{name} has no check capability"));
                continue;
            };
            if self.filter_mode && rule.kind == RuleKind::Path {
                session.notice(format!("{name} skipped in filter mode (needs a real file)"));
                continue;
            }

            let options = self.config.options_for(name);
            let ctx = CheckContext { path, content };
            match check(&ctx, &options, session.details_mut()) {
                Ok(CheckStatus::Pass) => session.clear_details(),
                Ok(CheckStatus::Fail) => {
                    let message = render_message(rule.message, &options);
                    session.record_failure(path, name, message);
                }
                Ok(CheckStatus::FailWith(message)) => {
                    session.record_failure(path, name, message);
                }
                Err(RuleError::Config(reason)) => {
                    session.clear_details();
                    session.notice(format!("{path}: cannot run {name}: {reason}"));
                }
                Err(err) => {
                    session.record_failure(path, name, format!("ERROR validating {name}: {err}"));
                }
            }
        }
    }
}

/// Substitute `{key}` placeholders in a rule's default message with its
/// configured option values.
fn render_message(template: &str, options: &RuleOptions) -> String {
    let mut message = template.to_string();
    for (key, value) in options {
        let placeholder = format!("{{{key}}}");
        if message.contains(&placeholder) {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            message = message.replace(&placeholder, &rendered);
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemFileStore;
    use crate::config::PatternRules;
    use codefix_rules::Rule;
    use codefix_types::Details;
    use pretty_assertions::assert_eq;

    fn check_always_fail(
        _ctx: &CheckContext<'_>,
        _opts: &RuleOptions,
        details: &mut Details,
    ) -> Result<CheckStatus, RuleError> {
        details.push("the reason", Some(1), None);
        Ok(CheckStatus::Fail)
    }

    fn check_dynamic(
        _ctx: &CheckContext<'_>,
        _opts: &RuleOptions,
        _details: &mut Details,
    ) -> Result<CheckStatus, RuleError> {
        Ok(CheckStatus::FailWith("custom diagnostic".into()))
    }

    fn check_config_error(
        _ctx: &CheckContext<'_>,
        _opts: &RuleOptions,
        details: &mut Details,
    ) -> Result<CheckStatus, RuleError> {
        details.push("must not leak", None, None);
        Err(RuleError::Config("missing option".into()))
    }

    fn check_exec_error(
        _ctx: &CheckContext<'_>,
        _opts: &RuleOptions,
        _details: &mut Details,
    ) -> Result<CheckStatus, RuleError> {
        Err(RuleError::Exec(anyhow::anyhow!("boom")))
    }

    fn check_pass(
        _ctx: &CheckContext<'_>,
        _opts: &RuleOptions,
        details: &mut Details,
    ) -> Result<CheckStatus, RuleError> {
        details.push("scratch", None, None);
        Ok(CheckStatus::Pass)
    }

    fn rule(name: &'static str, kind: RuleKind, check: codefix_rules::CheckFn) -> Rule {
        Rule {
            name,
            message: "failed",
            kind,
            check: Some(check),
            fix: None,
        }
    }

    fn registry() -> Registry {
        let mut reg = Registry::empty();
        reg.register(rule("always_fail", RuleKind::Content, check_always_fail));
        reg.register(rule("dynamic", RuleKind::Content, check_dynamic));
        reg.register(rule("config_err", RuleKind::Content, check_config_error));
        reg.register(rule("exec_err", RuleKind::Content, check_exec_error));
        reg.register(rule("passes", RuleKind::Content, check_pass));
        reg.register(rule("pathrule", RuleKind::Path, check_pass));
        reg
    }

    fn rules(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn outcomes_are_interpreted_per_status() {
        let reg = registry();
        let config = RuleSetConfig::default();
        let validator = Validator::new(&reg, &config);
        let mut session = Session::new();

        validator.validate_with_rules(
            Utf8Path::new("a.txt"),
            b"",
            &rules(&["always_fail", "dynamic", "exec_err", "passes"]),
            &mut session,
        );

        let violations = session.violations();
        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].message, "failed");
        assert_eq!(violations[0].details[0].message, "the reason");
        assert_eq!(violations[1].message, "custom diagnostic");
        assert_eq!(violations[1].details.len(), 0);
        assert_eq!(violations[2].message, "ERROR validating exec_err: boom");
    }

    #[test]
    fn config_errors_become_notices_and_clear_details() {
        let reg = registry();
        let config = RuleSetConfig::default();
        let validator = Validator::new(&reg, &config);
        let mut session = Session::new();

        validator.validate_with_rules(
            Utf8Path::new("a.txt"),
            b"",
            &rules(&["config_err", "always_fail"]),
            &mut session,
        );

        assert_eq!(session.notices().len(), 1);
        assert!(session.notices()[0].contains("missing option"));
        // Only always_fail recorded, with only its own detail.
        assert_eq!(session.violations().len(), 1);
        assert_eq!(session.violations()[0].details.len(), 1);
        assert_eq!(session.violations()[0].details[0].message, "the reason");
    }

    #[test]
    fn unknown_rules_are_noticed_not_fatal() {
        let reg = registry();
        let config = RuleSetConfig::default();
        let validator = Validator::new(&reg, &config);
        let mut session = Session::new();

        validator.validate_with_rules(
            Utf8Path::new("a.txt"),
            b"",
            &rules(&["no_such_rule", "always_fail"]),
            &mut session,
        );

        assert_eq!(session.notices(), ["no_such_rule does not exist"]);
        assert_eq!(session.violations().len(), 1);
    }

    #[test]
    fn filter_mode_skips_path_rules() {
        let reg = registry();
        let config = RuleSetConfig::default();
        let validator = Validator::new(&reg, &config).filter_mode(true);
        let mut session = Session::new();

        validator.validate_with_rules(
            Utf8Path::new("db_diffs/X-1/X-1.sql_diff"),
            b"",
            &rules(&["pathrule"]),
            &mut session,
        );

        assert!(session.notices()[0].contains("skipped in filter mode"));
        assert!(session.violations().is_empty());
    }

    #[test]
    fn validate_file_reads_through_the_store() {
        let reg = codefix_rules::Registry::builtin();
        let config = RuleSetConfig {
            patterns: vec![PatternRules {
                pattern: "*.txt".into(),
                rules: vec!["notabs".into(), "notrailingws".into()],
            }],
            dir_rules: vec![],
            ..RuleSetConfig::default()
        };
        let validator = Validator::new(&reg, &config);
        let store = MemFileStore::with_file("a.txt", b"foo\t \n".to_vec());
        let mut session = Session::new();

        validator
            .validate_file(&store, Utf8Path::new("a.txt"), &mut session)
            .unwrap();

        let failed: Vec<&str> = session.violations().iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(failed, ["notabs", "notrailingws"]);
    }

    #[test]
    fn excluded_files_are_not_read() {
        let reg = Registry::builtin();
        let config = RuleSetConfig::default();
        let validator = Validator::new(&reg, &config);
        // Store is empty; an attempted read would fail the call.
        let store = MemFileStore::new();
        let mut session = Session::new();

        validator
            .validate_file(&store, Utf8Path::new("repo/.git/config"), &mut session)
            .unwrap();
        assert!(!session.has_failures());
    }

    #[test]
    fn message_placeholders_render_from_options() {
        let mut options = RuleOptions::new();
        options.insert("standard".into(), serde_json::json!("PSR"));
        options.insert("max".into(), serde_json::json!(120));
        assert_eq!(
            render_message("violates {standard} (limit {max})", &options),
            "violates PSR (limit 120)"
        );
        assert_eq!(render_message("no placeholders", &options), "no placeholders");
    }
}
