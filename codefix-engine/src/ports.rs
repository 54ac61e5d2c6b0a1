//! Port trait abstracting file storage away from dispatch and fixing.

use camino::Utf8Path;

/// File storage as the engine sees it.
///
/// The filesystem adapter writes atomically and creates sibling backups; the
/// in-memory adapter backs filter mode and tests, where the path is virtual
/// and backups are meaningless.
pub trait FileStore {
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>>;

    /// Replace the file's contents. Must be atomic: observers see either the
    /// old content or the new, never a partial write.
    fn write(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;

    /// Copy the file to a sibling named `backup_name`, preserving metadata.
    fn backup(&self, path: &Utf8Path, backup_name: &str) -> anyhow::Result<()>;
}
