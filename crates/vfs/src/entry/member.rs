//! Entries materialized from expanded archives.
//!
//! Archive members hold their content in memory: the whole archive was
//! already fetched to trigger expansion, so member reads never touch
//! the network.

use std::time::SystemTime;

/// A regular file extracted from an archive.
#[derive(Debug)]
pub struct MemberFileEntry {
    path: String,
    data: Vec<u8>,
    mtime: SystemTime,
}

impl MemberFileEntry {
    /// Create a new member file entry.
    ///
    /// # Arguments
    /// * `path` - Absolute path of the member inside the `.unp` subtree
    /// * `data` - Decompressed member content
    /// * `mtime` - Modification time recorded in the archive
    pub fn new(path: impl Into<String>, data: Vec<u8>, mtime: SystemTime) -> Self {
        Self {
            path: path.into(),
            data,
            mtime,
        }
    }

    /// Get the absolute path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the decompressed content.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the modification time.
    pub fn mtime(&self) -> SystemTime {
        self.mtime
    }
}

/// A directory inside an expanded archive, including the `.unp` root.
#[derive(Debug)]
pub struct MemberDirEntry {
    path: String,
    mtime: SystemTime,
}

impl MemberDirEntry {
    /// Create a new member directory entry.
    pub fn new(path: impl Into<String>, mtime: SystemTime) -> Self {
        Self {
            path: path.into(),
            mtime,
        }
    }

    /// Get the absolute path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the modification time.
    pub fn mtime(&self) -> SystemTime {
        self.mtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_file_holds_content() {
        let member: MemberFileEntry = MemberFileEntry::new(
            "/HW1/Alice/1/code.zip.unp/main.rs",
            b"fn main() {}".to_vec(),
            SystemTime::UNIX_EPOCH,
        );
        assert_eq!(member.data(), b"fn main() {}");
        assert_eq!(member.path(), "/HW1/Alice/1/code.zip.unp/main.rs");
    }

    #[test]
    fn test_member_dir() {
        let dir: MemberDirEntry =
            MemberDirEntry::new("/HW1/Alice/1/code.zip.unp", SystemTime::UNIX_EPOCH);
        assert_eq!(dir.path(), "/HW1/Alice/1/code.zip.unp");
    }
}
