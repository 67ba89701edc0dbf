//! FUSE filesystem implementation.

#[cfg(feature = "fuse")]
mod impl_fuse {
    use std::collections::HashMap;
    use std::ffi::OsStr;
    use std::sync::{Arc, RwLock};
    use std::time::Duration;

    use fuser::{
        FileAttr, FileType, Filesystem, ReplyAttr, ReplyData, ReplyDirectory, ReplyEntry, Request,
    };

    use crate::archive::ensure_expanded;
    use crate::content::ContentCache;
    use crate::entry::{slice_range, Entry, EntryAttributes, FileKind, UnpackLog};
    use crate::error::FsError;
    use crate::namespace::{join_path, parent_of, Namespace, ROOT_PATH};

    /// How long the kernel may cache attributes and entries.
    const TTL: Duration = Duration::from_secs(1);

    /// Inode number of the namespace root.
    const ROOT_INO: u64 = 1;

    /// Both inode maps, guarded together so they can never disagree.
    #[derive(Debug)]
    struct InodeTableInner {
        /// Inode number to the path it was assigned to.
        paths: HashMap<u64, String>,
        /// Path to its assigned inode number.
        inos: HashMap<String, u64>,
        /// Next inode number to hand out.
        next: u64,
    }

    /// Bidirectional inode-to-path table.
    ///
    /// The kernel addresses entries by inode number while the namespace
    /// is keyed by path. Numbers are handed out the first time a path
    /// is seen and are never reused, so an inode stays valid for as
    /// long as the mount lives.
    #[derive(Debug)]
    struct InodeTable {
        inner: RwLock<InodeTableInner>,
    }

    impl InodeTable {
        /// Create a table holding only the root mapping.
        fn new() -> Self {
            let mut inner = InodeTableInner {
                paths: HashMap::new(),
                inos: HashMap::new(),
                next: ROOT_INO + 1,
            };
            inner.paths.insert(ROOT_INO, ROOT_PATH.to_string());
            inner.inos.insert(ROOT_PATH.to_string(), ROOT_INO);
            Self {
                inner: RwLock::new(inner),
            }
        }

        /// Get the inode number for a path, assigning one on first sight.
        fn ino_for(&self, path: &str) -> u64 {
            if let Some(ino) = self.inner.read().unwrap().inos.get(path).copied() {
                return ino;
            }

            let mut inner = self.inner.write().unwrap();
            // Another thread may have assigned one while we waited.
            if let Some(ino) = inner.inos.get(path).copied() {
                return ino;
            }
            let ino: u64 = inner.next;
            inner.next += 1;
            inner.paths.insert(ino, path.to_string());
            inner.inos.insert(path.to_string(), ino);
            ino
        }

        /// Get the path an inode number was assigned to.
        fn path_for(&self, ino: u64) -> Option<String> {
            self.inner.read().unwrap().paths.get(&ino).cloned()
        }
    }

    /// Read-only FUSE filesystem over a course handin namespace.
    pub struct HandinFs {
        /// The virtual tree being served.
        namespace: Arc<Namespace>,
        /// Disk cache attachment content is fetched through.
        cache: Arc<ContentCache>,
        /// Log of archive members expanded so far.
        unpack_log: Arc<UnpackLog>,
        /// Inode-to-path table.
        inodes: InodeTable,
    }

    impl HandinFs {
        /// Create a filesystem over a built namespace.
        ///
        /// # Arguments
        /// * `namespace` - The tree to serve
        /// * `cache` - Content cache backing attachment reads
        /// * `unpack_log` - Shared log that archive expansions append to
        pub fn new(
            namespace: Arc<Namespace>,
            cache: Arc<ContentCache>,
            unpack_log: Arc<UnpackLog>,
        ) -> Self {
            Self {
                namespace,
                cache,
                unpack_log,
                inodes: InodeTable::new(),
            }
        }

        /// Get the attributes of the entry at a path.
        ///
        /// Never fetches content; sizes come from the dataset record or
        /// from content already held in memory.
        pub fn getattr_path(&self, path: &str) -> Result<EntryAttributes, FsError> {
            let entry: Arc<Entry> = self.lookup_path(path)?;
            Ok(entry.attributes())
        }

        /// Read a byte range of the entry at a path.
        ///
        /// The first successful read of an archive root also expands
        /// its member subtree into the namespace; the raw archive bytes
        /// are returned either way.
        pub fn read_path(&self, path: &str, offset: i64, size: u32) -> Result<Vec<u8>, FsError> {
            let entry: Arc<Entry> = self.lookup_path(path)?;

            if let Entry::ArchiveRoot(archive) = entry.as_ref() {
                let file = archive.file();
                let data: Vec<u8> = self.cache.fetch(file.content_id(), file.source_url())?;
                ensure_expanded(&self.namespace, &self.unpack_log, archive, &data);
                return Ok(slice_range(&data, offset, size));
            }

            entry.read_range(offset, size, &self.cache)
        }

        /// List the child names of the directory at a path.
        ///
        /// Unknown paths yield an empty list, like empty directories.
        pub fn readdir_path(&self, path: &str) -> Vec<String> {
            self.namespace.children_of(path)
        }

        fn lookup_path(&self, path: &str) -> Result<Arc<Entry>, FsError> {
            self.namespace.lookup(path).ok_or_else(|| FsError::NotFound {
                path: path.to_string(),
            })
        }

        /// Convert entry attributes to FUSE file attributes.
        fn to_file_attr(&self, ino: u64, attrs: &EntryAttributes) -> FileAttr {
            let kind: FileType = match attrs.kind {
                FileKind::RegularFile => FileType::RegularFile,
                FileKind::Directory => FileType::Directory,
            };

            FileAttr {
                ino,
                size: attrs.size,
                blocks: (attrs.size + 511) / 512,
                atime: attrs.mtime,
                mtime: attrs.mtime,
                ctime: attrs.mtime,
                crtime: attrs.mtime,
                kind,
                perm: attrs.perm,
                nlink: attrs.nlink,
                uid: unsafe { libc::getuid() },
                gid: unsafe { libc::getgid() },
                rdev: 0,
                blksize: 512,
                flags: 0,
            }
        }
    }

    impl Filesystem for HandinFs {
        fn lookup(&mut self, _req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
            let name_str: &str = match name.to_str() {
                Some(n) => n,
                None => {
                    reply.error(libc::ENOENT);
                    return;
                }
            };

            let parent_path: String = match self.inodes.path_for(parent) {
                Some(p) => p,
                None => {
                    reply.error(libc::ENOENT);
                    return;
                }
            };

            let path: String = join_path(&parent_path, name_str);
            match self.getattr_path(&path) {
                Ok(attrs) => {
                    let ino: u64 = self.inodes.ino_for(&path);
                    reply.entry(&TTL, &self.to_file_attr(ino, &attrs), 0);
                }
                Err(err) => reply.error(err.errno()),
            }
        }

        fn getattr(&mut self, _req: &Request, ino: u64, reply: ReplyAttr) {
            let path: String = match self.inodes.path_for(ino) {
                Some(p) => p,
                None => {
                    reply.error(libc::ENOENT);
                    return;
                }
            };

            match self.getattr_path(&path) {
                Ok(attrs) => reply.attr(&TTL, &self.to_file_attr(ino, &attrs)),
                Err(err) => reply.error(err.errno()),
            }
        }

        fn readdir(
            &mut self,
            _req: &Request,
            ino: u64,
            _fh: u64,
            offset: i64,
            mut reply: ReplyDirectory,
        ) {
            let path: String = match self.inodes.path_for(ino) {
                Some(p) => p,
                None => {
                    reply.error(libc::ENOENT);
                    return;
                }
            };

            let dir: Arc<Entry> = match self.namespace.lookup(&path) {
                Some(entry) => entry,
                None => {
                    reply.error(libc::ENOENT);
                    return;
                }
            };
            if !dir.is_dir() {
                reply.error(libc::ENOTDIR);
                return;
            }

            let parent_ino: u64 = self.inodes.ino_for(parent_of(&path));
            let mut entries: Vec<(u64, FileType, String)> = vec![
                (ino, FileType::Directory, ".".to_string()),
                (parent_ino, FileType::Directory, "..".to_string()),
            ];

            for name in self.namespace.children_of(&path) {
                let child_path: String = join_path(&path, &name);
                if let Some(child) = self.namespace.lookup(&child_path) {
                    let kind: FileType = match child.kind() {
                        FileKind::RegularFile => FileType::RegularFile,
                        FileKind::Directory => FileType::Directory,
                    };
                    entries.push((self.inodes.ino_for(&child_path), kind, name));
                }
            }

            for (i, (e_ino, kind, name)) in entries.iter().enumerate().skip(offset as usize) {
                if reply.add(*e_ino, (i + 1) as i64, *kind, name) {
                    break;
                }
            }
            reply.ok();
        }

        fn read(
            &mut self,
            _req: &Request,
            ino: u64,
            _fh: u64,
            offset: i64,
            size: u32,
            _flags: i32,
            _lock: Option<u64>,
            reply: ReplyData,
        ) {
            let path: String = match self.inodes.path_for(ino) {
                Some(p) => p,
                None => {
                    reply.error(libc::ENOENT);
                    return;
                }
            };

            match self.read_path(&path, offset, size) {
                Ok(data) => reply.data(&data),
                Err(err) => reply.error(err.errno()),
            }
        }
    }

    /// Mount the filesystem and serve until it is unmounted.
    ///
    /// # Arguments
    /// * `fs` - The filesystem to mount
    /// * `mountpoint` - Path to mount at
    pub fn mount(fs: HandinFs, mountpoint: &std::path::Path) -> Result<(), FsError> {
        use fuser::MountOption;
        fuser::mount2(
            fs,
            mountpoint,
            &[
                MountOption::RO,
                MountOption::FSName("handinfs".into()),
                MountOption::AllowOther,
                MountOption::AutoUnmount,
            ],
        )
        .map_err(|e| FsError::Mount(e.to_string()))
    }

    /// Spawn the filesystem mount in the background.
    ///
    /// # Arguments
    /// * `fs` - The filesystem to mount
    /// * `mountpoint` - Path to mount at
    ///
    /// # Returns
    /// Background session handle; dropping it unmounts.
    pub fn spawn_mount(
        fs: HandinFs,
        mountpoint: &std::path::Path,
    ) -> Result<fuser::BackgroundSession, FsError> {
        use fuser::MountOption;
        fuser::spawn_mount2(
            fs,
            mountpoint,
            &[
                MountOption::RO,
                MountOption::FSName("handinfs".into()),
                MountOption::AllowOther,
                MountOption::AutoUnmount,
            ],
        )
        .map_err(|e| FsError::Mount(e.to_string()))
    }
}

#[cfg(feature = "fuse")]
pub use impl_fuse::{mount, spawn_mount, HandinFs};
