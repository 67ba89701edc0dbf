//! Path-indexed namespace over all entries.
//!
//! The namespace is the single owner of every [`Entry`] in the tree.
//! It keeps two views in lockstep under one lock: a path-to-entry map
//! and a directory-to-child-names map. Inserting an entry backfills
//! any missing ancestor directories, so every reachable path always
//! has a complete parent chain and `readdir` works at every level.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use tracing::warn;

use crate::entry::{DirectoryEntry, Entry};

/// Path of the namespace root.
pub const ROOT_PATH: &str = "/";

/// Both index maps, guarded together so they can never disagree.
#[derive(Debug, Default)]
struct NamespaceInner {
    /// Absolute path to the entry living there.
    entries: HashMap<String, Arc<Entry>>,
    /// Directory path to its child names, in insertion order.
    children: HashMap<String, Vec<String>>,
}

/// The complete virtual tree, indexed by absolute path.
#[derive(Debug)]
pub struct Namespace {
    inner: RwLock<NamespaceInner>,
}

impl Namespace {
    /// Create a namespace holding only the root directory.
    ///
    /// The root's modification time is the moment of construction.
    pub fn new() -> Self {
        let mut inner = NamespaceInner::default();
        let root = Entry::Directory(DirectoryEntry::new(ROOT_PATH, SystemTime::now()));
        inner.entries.insert(ROOT_PATH.to_string(), Arc::new(root));
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Insert an entry, creating any missing ancestor directories.
    ///
    /// Backfilled ancestors inherit the inserted entry's modification
    /// time. If the path is already occupied the insert is ignored and
    /// a warning is logged; the first entry at a path wins.
    ///
    /// # Arguments
    /// * `entry` - Entry to insert at its own path
    ///
    /// # Returns
    /// `true` if the entry was inserted, `false` if the path was taken.
    pub fn insert(&self, entry: Entry) -> bool {
        let path: String = entry.path().to_string();
        let mtime: SystemTime = entry.mtime();
        let mut inner = self.inner.write().unwrap();

        if inner.entries.contains_key(&path) {
            warn!(path = %path, "entry already exists, keeping the first one");
            return false;
        }

        let parent: String = parent_of(&path).to_string();
        inner.entries.insert(path.clone(), Arc::new(entry));
        if path != parent {
            inner
                .children
                .entry(parent.clone())
                .or_default()
                .push(name_of(&path).to_string());
        }

        // Walk up until an ancestor that already exists. Each missing
        // one becomes a plain directory stamped with the new entry's
        // mtime.
        let mut current: String = parent;
        while !inner.entries.contains_key(&current) {
            let ancestor_parent: String = parent_of(&current).to_string();
            let backfilled = Entry::Directory(DirectoryEntry::new(current.clone(), mtime));
            inner.entries.insert(current.clone(), Arc::new(backfilled));
            if current != ancestor_parent {
                inner
                    .children
                    .entry(ancestor_parent.clone())
                    .or_default()
                    .push(name_of(&current).to_string());
            }
            current = ancestor_parent;
        }

        true
    }

    /// Look up the entry at a path.
    ///
    /// # Arguments
    /// * `path` - Absolute path to resolve
    ///
    /// # Returns
    /// The entry if the path exists.
    pub fn lookup(&self, path: &str) -> Option<Arc<Entry>> {
        self.inner.read().unwrap().entries.get(path).cloned()
    }

    /// Check whether a path exists.
    pub fn contains(&self, path: &str) -> bool {
        self.inner.read().unwrap().entries.contains_key(path)
    }

    /// List the child names of a directory, in insertion order.
    ///
    /// Unknown paths and paths without children both yield an empty
    /// list.
    pub fn children_of(&self, path: &str) -> Vec<String> {
        self.inner
            .read()
            .unwrap()
            .children
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of entries, the root included.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    /// Check whether only the root exists.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the parent of an absolute path.
///
/// The root is its own parent.
///
/// # Arguments
/// * `path` - Absolute slash-separated path
pub fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => ROOT_PATH,
        Some(pos) => &path[..pos],
    }
}

/// Get the final component of an absolute path.
///
/// The root has an empty name.
pub fn name_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Join a child name onto a directory path.
///
/// # Arguments
/// * `dir` - Absolute directory path
/// * `name` - Child name to append
pub fn join_path(dir: &str, name: &str) -> String {
    if dir == ROOT_PATH {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}
