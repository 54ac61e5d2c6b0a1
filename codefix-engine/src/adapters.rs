//! Default file-store implementations: filesystem and in-memory.

use std::collections::HashMap;
use std::io::Write as _;
use std::sync::Mutex;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::ports::FileStore;

/// Filesystem-backed store with atomic replacement.
#[derive(Debug, Clone, Default)]
pub struct FsFileStore;

impl FileStore for FsFileStore {
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>> {
        fs_err::read(path).with_context(|| format!("read {path}"))
    }

    /// Write to a temp file in the same directory, carry over the original
    /// permissions, then rename over the target.
    fn write(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        let parent = path.parent().unwrap_or(Utf8Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("create temp file in {parent}"))?;
        tmp.write_all(contents)
            .with_context(|| format!("write temp file for {path}"))?;
        if let Ok(meta) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .with_context(|| format!("carry permissions over to {path}"))?;
        }
        tmp.persist(path)
            .with_context(|| format!("replace {path}"))?;
        debug!(%path, bytes = contents.len(), "file replaced");
        Ok(())
    }

    fn backup(&self, path: &Utf8Path, backup_name: &str) -> anyhow::Result<()> {
        let target = path
            .parent()
            .unwrap_or(Utf8Path::new("."))
            .join(backup_name);
        fs_err::copy(path, &target).with_context(|| format!("back up {path} to {target}"))?;
        debug!(%path, %target, "backup created");
        Ok(())
    }
}

/// In-memory store for filter mode and tests.
#[derive(Debug, Default)]
pub struct MemFileStore {
    files: Mutex<HashMap<Utf8PathBuf, Vec<u8>>>,
}

impl MemFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(path: impl Into<Utf8PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store
            .files
            .lock()
            .unwrap()
            .insert(path.into(), contents.into());
        store
    }

    pub fn get(&self, path: &Utf8Path) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl FileStore for MemFileStore {
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .with_context(|| format!("no such in-memory file: {path}"))
    }

    fn write(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_owned(), contents.to_vec());
        Ok(())
    }

    /// Virtual paths have nothing on disk to preserve.
    fn backup(&self, _path: &Utf8Path, _backup_name: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
