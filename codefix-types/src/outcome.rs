use crate::detail::Detail;
use camino::Utf8PathBuf;

/// What a rule's check capability receives.
///
/// Most rules read the file's raw bytes; directory-scoped rules match on the
/// path itself (and may inspect the backing file on disk).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Content,
    Path,
}

/// Result of one check invocation that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Failed; report with the rule's default message.
    Fail,
    /// Failed with a dynamic, context-specific message.
    FailWith(String),
}

/// One recorded (file, rule) failure, in session order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: Utf8PathBuf,
    pub rule: String,
    pub message: String,
    pub details: Vec<Detail>,
}

/// Outcome of the fix pipeline for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// Every stage succeeded and the file was rewritten.
    Applied { bytes: usize },
    /// A stage failed or produced an empty result; the file is untouched.
    Failed { reason: String },
}

impl FixOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FixOutcome::Applied { .. })
    }
}
