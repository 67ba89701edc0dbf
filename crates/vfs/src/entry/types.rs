//! Core entry types shared across the namespace.

use std::time::SystemTime;

/// Permission bits for every directory in the tree (read + traverse).
pub const DIR_PERMS: u16 = 0o555;

/// Permission bits for every file in the tree (read only).
pub const FILE_PERMS: u16 = 0o444;

/// Kind of namespace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Regular file.
    RegularFile,
    /// Directory.
    Directory,
}

/// Stat-level attributes of an entry.
///
/// The tree is immutable from the kernel's point of view, so creation,
/// modification, and access time are all the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryAttributes {
    /// Entry kind.
    pub kind: FileKind,
    /// POSIX permission bits.
    pub perm: u16,
    /// Hard link count.
    pub nlink: u32,
    /// Size in bytes.
    pub size: u64,
    /// Modification time, also reported as creation and access time.
    pub mtime: SystemTime,
}

impl EntryAttributes {
    /// Attributes for a directory entry.
    pub fn directory(mtime: SystemTime) -> Self {
        Self {
            kind: FileKind::Directory,
            perm: DIR_PERMS,
            nlink: 2,
            size: 0,
            mtime,
        }
    }

    /// Attributes for a regular file entry.
    pub fn regular(size: u64, mtime: SystemTime) -> Self {
        Self {
            kind: FileKind::RegularFile,
            perm: FILE_PERMS,
            nlink: 1,
            size,
            mtime,
        }
    }
}

/// Clip a read request against in-memory content.
///
/// Reads past the end return an empty buffer; reads straddling the end
/// are shortened to the available bytes.
///
/// # Arguments
/// * `data` - Full content
/// * `offset` - Byte offset of the read
/// * `size` - Requested read length
pub fn slice_range(data: &[u8], offset: i64, size: u32) -> Vec<u8> {
    let len: u64 = data.len() as u64;
    let off: u64 = offset.max(0) as u64;
    if off >= len {
        return Vec::new();
    }
    let end: u64 = (off + size as u64).min(len);
    data[off as usize..end as usize].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_attributes() {
        let attrs: EntryAttributes = EntryAttributes::directory(SystemTime::UNIX_EPOCH);
        assert_eq!(attrs.kind, FileKind::Directory);
        assert_eq!(attrs.perm, 0o555);
        assert_eq!(attrs.nlink, 2);
        assert_eq!(attrs.size, 0);
    }

    #[test]
    fn test_regular_attributes() {
        let attrs: EntryAttributes = EntryAttributes::regular(1234, SystemTime::UNIX_EPOCH);
        assert_eq!(attrs.kind, FileKind::RegularFile);
        assert_eq!(attrs.perm, 0o444);
        assert_eq!(attrs.nlink, 1);
        assert_eq!(attrs.size, 1234);
    }

    #[test]
    fn test_slice_range_full_read() {
        assert_eq!(slice_range(b"hello", 0, 100), b"hello");
    }

    #[test]
    fn test_slice_range_offset_read() {
        assert_eq!(slice_range(b"hello", 2, 2), b"ll");
    }

    #[test]
    fn test_slice_range_past_end() {
        assert_eq!(slice_range(b"hello", 5, 10), Vec::<u8>::new());
        assert_eq!(slice_range(b"hello", 100, 10), Vec::<u8>::new());
    }

    #[test]
    fn test_slice_range_straddles_end() {
        assert_eq!(slice_range(b"hello", 3, 10), b"lo");
    }

    #[test]
    fn test_slice_range_negative_offset() {
        assert_eq!(slice_range(b"hello", -4, 3), b"hel");
    }

    #[test]
    fn test_slice_range_empty_content() {
        assert_eq!(slice_range(b"", 0, 10), Vec::<u8>::new());
    }
}
