//! Directory entries.

use std::time::SystemTime;

/// A directory from the course dataset level of the tree.
///
/// Children are tracked by the namespace, not by the directory itself.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    path: String,
    mtime: SystemTime,
}

impl DirectoryEntry {
    /// Create a new directory entry.
    ///
    /// # Arguments
    /// * `path` - Absolute path of the directory
    /// * `mtime` - Modification time reported for the directory
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
