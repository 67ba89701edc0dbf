//! Namespace entry primitives.
//!
//! This module provides the data structures for everything the mounted
//! tree can contain: dataset directories, remote files, archive roots,
//! expanded archive members, and the synthetic metadata and diagnostics
//! documents.

mod dir;
mod file;
mod member;
mod synthetic;
mod types;

pub use dir::DirectoryEntry;
pub use file::{ArchiveRootEntry, RemoteFileEntry};
pub use member::{MemberDirEntry, MemberFileEntry};
pub use synthetic::{DebugDocEntry, MetaDocEntry, UnpackLog, DEBUG_DOC_PATH};
pub use types::{slice_range, EntryAttributes, FileKind, DIR_PERMS, FILE_PERMS};

use std::time::SystemTime;

use crate::content::ContentCache;
use crate::error::FsError;

/// One entry in the namespace.
///
/// The set of entry kinds is closed, so operations dispatch over this
/// enum rather than a trait object.
#[derive(Debug)]
pub enum Entry {
    /// Directory from the dataset hierarchy, including backfilled ones.
    Directory(DirectoryEntry),
    /// File whose content is fetched from upstream on first read.
    RemoteFile(RemoteFileEntry),
    /// Remote zip file that expands into a sibling subtree on first read.
    ArchiveRoot(ArchiveRootEntry),
    /// Pre-rendered `.meta` document.
    MetaDoc(MetaDocEntry),
    /// Directory inside an expanded archive.
    MemberDir(MemberDirEntry),
    /// File extracted from an expanded archive.
    MemberFile(MemberFileEntry),
    /// The `/.debuginfo.json` diagnostics document.
    DebugDoc(DebugDocEntry),
}

impl Entry {
    /// Get the absolute path of the entry.
    pub fn path(&self) -> &str {
        match self {
            Entry::Directory(e) => e.path(),
            Entry::RemoteFile(e) => e.path(),
            Entry::ArchiveRoot(e) => e.file().path(),
            Entry::MetaDoc(e) => e.path(),
            Entry::MemberDir(e) => e.path(),
            Entry::MemberFile(e) => e.path(),
            Entry::DebugDoc(e) => e.path(),
        }
    }

    /// Get the modification time of the entry.
    pub fn mtime(&self) -> SystemTime {
        match self {
            Entry::Directory(e) => e.mtime(),
            Entry::RemoteFile(e) => e.mtime(),
            Entry::ArchiveRoot(e) => e.file().mtime(),
            Entry::MetaDoc(e) => e.mtime(),
            Entry::MemberDir(e) => e.mtime(),
            Entry::MemberFile(e) => e.mtime(),
            Entry::DebugDoc(e) => e.mtime(),
        }
    }

    /// Get the entry kind.
    pub fn kind(&self) -> FileKind {
        match self {
            Entry::Directory(_) | Entry::MemberDir(_) => FileKind::Directory,
            _ => FileKind::RegularFile,
        }
    }

    /// Check whether the entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind() == FileKind::Directory
    }

    /// Get the stat-level attributes of the entry.
    ///
    /// Sizes come from the dataset record for remote files and from the
    /// held content for everything else; no attribute request ever
    /// triggers a fetch.
    pub fn attributes(&self) -> EntryAttributes {
        match self {
            Entry::Directory(e) => EntryAttributes::directory(e.mtime()),
            Entry::MemberDir(e) => EntryAttributes::directory(e.mtime()),
            Entry::RemoteFile(e) => EntryAttributes::regular(e.size(), e.mtime()),
            Entry::ArchiveRoot(e) => {
                EntryAttributes::regular(e.file().size(), e.file().mtime())
            }
            Entry::MetaDoc(e) => {
                EntryAttributes::regular(e.content().len() as u64, e.mtime())
            }
            Entry::MemberFile(e) => {
                EntryAttributes::regular(e.data().len() as u64, e.mtime())
            }
            Entry::DebugDoc(e) => {
                EntryAttributes::regular(e.render().len() as u64, e.mtime())
            }
        }
    }

    /// Read a byte range of the entry's content.
    ///
    /// Remote content goes through the cache; everything else is served
    /// from memory. Reading an archive root here returns its raw bytes
    /// without expanding it; expansion is the filesystem layer's job.
    ///
    /// # Arguments
    /// * `offset` - Byte offset of the read
    /// * `size` - Requested read length
    /// * `cache` - Content cache used for remote entries
    pub fn read_range(
        &self,
        offset: i64,
        size: u32,
        cache: &ContentCache,
    ) -> Result<Vec<u8>, FsError> {
        match self {
            Entry::Directory(e) => Err(FsError::IsDirectory {
                path: e.path().to_string(),
            }),
            Entry::MemberDir(e) => Err(FsError::IsDirectory {
                path: e.path().to_string(),
            }),
            Entry::RemoteFile(e) => e.fetch_range(offset, size, cache),
            Entry::ArchiveRoot(e) => e.file().fetch_range(offset, size, cache),
            Entry::MetaDoc(e) => Ok(slice_range(e.content(), offset, size)),
            Entry::MemberFile(e) => Ok(slice_range(e.data(), offset, size)),
            Entry::DebugDoc(e) => Ok(slice_range(&e.render(), offset, size)),
        }
    }
}
