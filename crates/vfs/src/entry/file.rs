//! Remote file entries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use crate::content::ContentCache;
use crate::entry::types::slice_range;
use crate::error::FsError;

/// A file whose content lives upstream and is fetched on first read.
///
/// Attributes come from the dataset record, so `stat` never triggers a
/// fetch; the reported size is whatever the record declared.
#[derive(Debug)]
pub struct RemoteFileEntry {
    path: String,
    content_id: String,
    source_url: String,
    size: u64,
    mtime: SystemTime,
}

impl RemoteFileEntry {
    /// Create a new remote file entry.
    ///
    /// # Arguments
    /// * `path` - Absolute path of the file
    /// * `content_id` - Cache key identifying the content upstream
    /// * `source_url` - URL the content is fetched from on a cache miss
    /// * `size` - Size in bytes as declared by the dataset record
    /// * `mtime` - Modification time reported for the file
    pub fn new(
        path: impl Into<String>,
        content_id: impl Into<String>,
        source_url: impl Into<String>,
        size: u64,
        mtime: SystemTime,
    ) -> Self {
        Self {
            path: path.into(),
            content_id: content_id.into(),
            source_url: source_url.into(),
            size,
            mtime,
        }
    }

    /// Get the absolute path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the content cache key.
    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    /// Get the source URL.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Get the declared size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get the modification time.
    pub fn mtime(&self) -> SystemTime {
        self.mtime
    }

    /// Read a byte range of the file, fetching content through the cache.
    pub fn fetch_range(
        &self,
        offset: i64,
        size: u32,
        cache: &ContentCache,
    ) -> Result<Vec<u8>, FsError> {
        let data: Vec<u8> = cache.fetch(&self.content_id, &self.source_url)?;
        Ok(slice_range(&data, offset, size))
    }
}

/// A remote zip file that doubles as the root of an expanded subtree.
///
/// The first successful read of the file's bytes inserts the archive's
/// members into the namespace under a `<name>.unp` sibling directory.
/// The expansion flag flips exactly once, after the whole subtree is in
/// place, so concurrent readers either see no members or all of them.
#[derive(Debug)]
pub struct ArchiveRootEntry {
    file: RemoteFileEntry,
    expanded: AtomicBool,
    expand_lock: Mutex<()>,
}

impl ArchiveRootEntry {
    /// Create a new archive root around a remote file.
    pub fn new(file: RemoteFileEntry) -> Self {
        Self {
            file,
            expanded: AtomicBool::new(false),
            expand_lock: Mutex::new(()),
        }
    }

    /// Get the underlying remote file.
    pub fn file(&self) -> &RemoteFileEntry {
        &self.file
    }

    /// Check whether the member subtree has been fully inserted.
    pub fn is_expanded(&self) -> bool {
        self.expanded.load(Ordering::Acquire)
    }

    /// Mark the member subtree as fully inserted.
    ///
    /// Must only be called while holding the expansion guard.
    pub(crate) fn mark_expanded(&self) {
        self.expanded.store(true, Ordering::Release);
    }

    /// Take the lock serializing expansion attempts for this archive.
    pub(crate) fn expansion_guard(&self) -> MutexGuard<'_, ()> {
        self.expand_lock.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> RemoteFileEntry {
        RemoteFileEntry::new(
            "/HW1/Alice/1/code.zip",
            "42",
            "http://files.example/42",
            1234,
            SystemTime::UNIX_EPOCH,
        )
    }

    #[test]
    fn test_remote_file_accessors() {
        let file: RemoteFileEntry = sample_file();
        assert_eq!(file.path(), "/HW1/Alice/1/code.zip");
        assert_eq!(file.content_id(), "42");
        assert_eq!(file.source_url(), "http://files.example/42");
        assert_eq!(file.size(), 1234);
    }

    #[test]
    fn test_archive_root_starts_unexpanded() {
        let root: ArchiveRootEntry = ArchiveRootEntry::new(sample_file());
        assert!(!root.is_expanded());
    }

    #[test]
    fn test_archive_root_expansion_flag() {
        let root: ArchiveRootEntry = ArchiveRootEntry::new(sample_file());
        {
            let _guard = root.expansion_guard();
            root.mark_expanded();
        }
        assert!(root.is_expanded());
    }
}
