//! Diagnostic Collector: the run-scoped session.

use camino::{Utf8Path, Utf8PathBuf};
use codefix_types::{Details, Violation};

/// Accumulates violations and notices for one whole run.
///
/// The dispatcher appends, the reporter reads, and the fix stage groups the
/// violations by file. Nothing is ever rolled back; the list is the contract
/// between "what failed" and "what to auto-fix".
#[derive(Debug, Default)]
pub struct Session {
    violations: Vec<Violation>,
    notices: Vec<String>,
    details: Details,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transient sink the currently running check pushes details into.
    pub fn details_mut(&mut self) -> &mut Details {
        &mut self.details
    }

    /// Record a failure, draining the detail sink into the violation.
    pub fn record_failure(&mut self, path: &Utf8Path, rule: &str, message: String) {
        self.violations.push(Violation {
            path: path.to_owned(),
            rule: rule.to_string(),
            message,
            details: self.details.drain(),
        });
    }

    /// Details from a passing or aborted check must not leak into the next
    /// rule's violation.
    pub fn clear_details(&mut self) {
        self.details.clear();
    }

    pub fn notice(&mut self, message: String) {
        self.notices.push(message);
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn has_failures(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Failed rules grouped per file, first-seen order on both levels, each
    /// file's rule list deduplicated (a file matching several patterns can
    /// fail the same rule more than once).
    pub fn rules_by_file(&self) -> Vec<(Utf8PathBuf, Vec<String>)> {
        let mut grouped: Vec<(Utf8PathBuf, Vec<String>)> = Vec::new();
        for violation in &self.violations {
            let entry = match grouped.iter_mut().find(|(path, _)| *path == violation.path) {
                Some(entry) => entry,
                None => {
                    grouped.push((violation.path.clone(), Vec::new()));
                    grouped.last_mut().unwrap()
                }
            };
            if !entry.1.contains(&violation.rule) {
                entry.1.push(violation.rule.clone());
            }
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failure_drains_the_detail_sink() {
        let mut session = Session::new();
        session.details_mut().push("bad byte", Some(3), None);
        session.record_failure(Utf8Path::new("a.txt"), "utf8", "is not UTF-8".into());

        let violations = session.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].details.len(), 1);
        // The sink is empty again for the next rule.
        session.record_failure(Utf8Path::new("a.txt"), "notabs", "contains tabs".into());
        assert!(session.violations()[1].details.is_empty());
    }

    #[test]
    fn clear_details_isolates_passing_checks() {
        let mut session = Session::new();
        session.details_mut().push("leftover", None, None);
        session.clear_details();
        session.record_failure(Utf8Path::new("a.txt"), "notabs", "contains tabs".into());
        assert!(session.violations()[0].details.is_empty());
    }

    #[test]
    fn rules_by_file_groups_and_dedups_in_first_seen_order() {
        let mut session = Session::new();
        session.record_failure(Utf8Path::new("b.txt"), "notabs", "m".into());
        session.record_failure(Utf8Path::new("a.txt"), "nocr", "m".into());
        session.record_failure(Utf8Path::new("b.txt"), "notrailingws", "m".into());
        session.record_failure(Utf8Path::new("b.txt"), "notabs", "m".into());

        let grouped = session.rules_by_file();
        assert_eq!(
            grouped,
            vec![
                (Utf8PathBuf::from("b.txt"), vec!["notabs".to_string(), "notrailingws".to_string()]),
                (Utf8PathBuf::from("a.txt"), vec!["nocr".to_string()]),
            ]
        );
    }

    #[test]
    fn empty_session_has_no_failures() {
        let session = Session::new();
        assert!(!session.has_failures());
        assert!(session.rules_by_file().is_empty());
    }
}
