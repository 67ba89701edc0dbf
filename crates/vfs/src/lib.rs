//! FUSE-based virtual filesystem for course assignment handins.
//!
//! This crate provides a read-only FUSE filesystem over a course
//! dataset. Assignments, student submissions, and numbered attempts
//! appear as directories; attachments appear as files whose content is
//! fetched from the course system on first read and cached on disk.
//! Zip attachments additionally expand into a `<name>.unp` sibling
//! subtree the first time their bytes are read.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: FUSE Interface (fuser::Filesystem impl)
//! Layer 2: Path Operations (getattr, read, readdir)
//! Layer 1: Primitives (Namespace, Entry, ContentCache, archive expansion)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use handinfs_vfs::{build_namespace, ContentCache, HandinFs, HttpStore, UnpackLog};
//!
//! let assignments = handinfs_model::load_assignments(&dataset_path)?;
//! let log = Arc::new(UnpackLog::new());
//! let namespace = Arc::new(build_namespace(&assignments, log.clone()));
//! let cache = Arc::new(ContentCache::new(cache_dir, Arc::new(HttpStore::new()))?);
//! let fs = HandinFs::new(namespace, cache, log);
//! handinfs_vfs::mount(fs, std::path::Path::new("/mnt/handins"))?;
//! ```

pub mod archive;
pub mod builder;
pub mod content;
pub mod entry;
pub mod error;
pub mod namespace;

#[cfg(feature = "fuse")]
pub mod fuse;

pub use error::FsError;

pub use archive::{ensure_expanded, is_archive_name, UNPACK_SUFFIX};
pub use builder::{build_namespace, META_NAME};
pub use content::{ContentCache, HttpStore, MemoryStore, RemoteStore};
pub use entry::{Entry, EntryAttributes, FileKind, UnpackLog, DEBUG_DOC_PATH};
pub use namespace::{Namespace, ROOT_PATH};

#[cfg(feature = "fuse")]
pub use fuse::{mount, spawn_mount, HandinFs};
