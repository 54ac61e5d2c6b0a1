//! Fix Pipeline: chain rule fixers over one file, commit atomically.

use camino::Utf8Path;
use codefix_rules::Registry;
use codefix_types::FixOutcome;
use tracing::debug;

use crate::config::RuleSetConfig;
use crate::ports::FileStore;

/// Backup behavior for the fix pipeline.
#[derive(Debug, Clone)]
pub struct FixSettings {
    pub backup_enabled: bool,
    /// `{original}` expands to the file's basename.
    pub backup_template: String,
}

impl Default for FixSettings {
    fn default() -> Self {
        Self {
            backup_enabled: true,
            backup_template: ".{original}.codefix.bak".to_string(),
        }
    }
}

impl FixSettings {
    pub fn without_backup() -> Self {
        Self {
            backup_enabled: false,
            ..Self::default()
        }
    }

    fn backup_name(&self, path: &Utf8Path) -> String {
        let basename = path.file_name().unwrap_or_default();
        self.backup_template.replace("{original}", basename)
    }
}

/// Run the fix capabilities of `rules` over `path`, in order.
///
/// The content flows through in-memory buffers: each stage consumes the
/// previous stage's output. The first failing stage aborts the whole pipeline.
/// The file is rewritten only when every stage succeeded and the final buffer
/// is non-empty; an empty result is indistinguishable from a fixer that
/// destroyed the content, so it is discarded. Rules without a fix capability
/// are skipped; when none of the rules carries one there is nothing to run,
/// so the file (and its backup slot) is left untouched and the outcome is
/// `Failed`. The backup, when enabled, is taken once before the first stage.
pub fn fix_file(
    store: &dyn FileStore,
    path: &Utf8Path,
    rules: &[String],
    registry: &Registry,
    config: &RuleSetConfig,
    settings: &FixSettings,
) -> anyhow::Result<FixOutcome> {
    let has_fixer = rules
        .iter()
        .any(|name| registry.get(name).is_some_and(|rule| rule.fix.is_some()));
    if !has_fixer {
        return Ok(FixOutcome::Failed {
            reason: "no rule provides a fix, file unchanged".to_string(),
        });
    }

    if settings.backup_enabled {
        store.backup(path, &settings.backup_name(path))?;
    }

    let mut buffer = store.read(path)?;
    for name in rules {
        let Some(fix) = registry.get(name).and_then(|rule| rule.fix) else {
            debug!(%path, rule = %name, "no fix capability, skipping");
            continue;
        };
        debug!(%path, rule = %name, "fixing");
        let mut next = Vec::with_capacity(buffer.len());
        if let Err(err) = fix(&buffer, &mut next, &config.options_for(name)) {
            return Ok(FixOutcome::Failed {
                reason: format!("ERROR fixing {name}: {err}"),
            });
        }
        buffer = next;
    }

    if buffer.is_empty() {
        return Ok(FixOutcome::Failed {
            reason: "fix produced empty content, file unchanged".to_string(),
        });
    }

    store.write(path, &buffer)?;
    Ok(FixOutcome::Applied {
        bytes: buffer.len(),
    })
}
