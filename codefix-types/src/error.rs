/// Error raised by a rule capability.
///
/// The dispatcher treats the two variants very differently: `Config` is a
/// configuration problem (reported as a notice, the file's other rules still
/// run, it never counts as a validation failure), while `Exec` is converted
/// into a failure record for the invoked rule.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Exec(#[from] anyhow::Error),
}
