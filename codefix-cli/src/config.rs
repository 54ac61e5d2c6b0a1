//! Configuration file loading for codefix.
//!
//! Discovers `codefix.toml` in the current directory, falling back to
//! `~/.codefix.toml`. File settings override the builtin defaults; CLI flags
//! take precedence over both.

use std::collections::HashMap;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use codefix_engine::{DirRules, FixSettings, PatternRules, RuleSetConfig};
use codefix_rules::RuleOptions;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "codefix.toml";

/// Raw contents of a codefix.toml file. Every section is optional; absent
/// sections keep the builtin defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Replaces the whole builtin pattern table when present.
    pub patterns: Option<Vec<PatternRules>>,

    /// Replaces the whole builtin directory-rule table when present.
    pub dir_rules: Option<Vec<DirRules>>,

    /// Merged over the builtin (empty) per-rule options.
    pub options: Option<HashMap<String, RuleOptions>>,

    pub exclude_dirs: Option<Vec<String>>,
    pub exclude_files: Option<Vec<String>>,

    pub backup: Option<BackupConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    pub enabled: Option<bool>,
    /// Backup filename template; `{original}` expands to the basename.
    pub template: Option<String>,
}

impl FileConfig {
    /// Builtin defaults overridden by whatever the file sets.
    pub fn merge(self) -> (RuleSetConfig, FixSettings) {
        let mut config = RuleSetConfig::default();
        if let Some(patterns) = self.patterns {
            config.patterns = patterns;
        }
        if let Some(dir_rules) = self.dir_rules {
            config.dir_rules = dir_rules;
        }
        if let Some(options) = self.options {
            config.options.extend(options);
        }
        if let Some(exclude_dirs) = self.exclude_dirs {
            config.exclude_dirs = exclude_dirs;
        }
        if let Some(exclude_files) = self.exclude_files {
            config.exclude_files = exclude_files;
        }

        let mut settings = FixSettings::default();
        if let Some(backup) = self.backup {
            if let Some(enabled) = backup.enabled {
                settings.backup_enabled = enabled;
            }
            if let Some(template) = backup.template {
                settings.backup_template = template;
            }
        }
        (config, settings)
    }
}

/// Search order: explicit `-c` path, `./codefix.toml`, `~/.codefix.toml`.
pub fn discover_config(explicit: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }
    let local = Utf8PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        debug!("found config file at {local}");
        return Some(local);
    }
    if let Some(home) = std::env::var_os("HOME") {
        if let Ok(home) = Utf8PathBuf::from_path_buf(home.into()) {
            let user = home.join(".codefix.toml");
            if user.exists() {
                debug!("found config file at {user}");
                return Some(user);
            }
        }
    }
    None
}

pub fn parse_config(contents: &str) -> anyhow::Result<FileConfig> {
    toml::from_str(contents).context("invalid TOML")
}

/// Load and merge the discovered configuration, if any.
pub fn load(explicit: Option<&Utf8Path>) -> anyhow::Result<(RuleSetConfig, FixSettings)> {
    let file = match discover_config(explicit) {
        Some(path) => {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read config file {path}"))?;
            parse_config(&contents).with_context(|| format!("parse config file {path}"))?
        }
        None => FileConfig::default(),
    };
    Ok(file.merge())
}
