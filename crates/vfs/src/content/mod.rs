//! Content retrieval and the on-disk content cache.
//!
//! Attachment bytes live in the course system and are fetched lazily:
//! nothing is downloaded until a read request actually needs the
//! content. Fetched bytes are persisted under the cache directory keyed
//! by content identifier, so later reads (and later mounts) are served
//! from disk without touching the network.

mod store;

pub use store::{HttpStore, MemoryStore, RemoteStore};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::error::FsError;

/// Read-through disk cache over a remote store.
///
/// Content is stored as flat files with the content identifier as
/// filename. Fetches dedupe per identifier: concurrent readers of the
/// same uncached content block on one download instead of issuing
/// several.
///
/// # Directory Structure
/// ```text
/// cache_dir/
/// ├── 42          # Content file (identifier as filename)
/// ├── 57
/// └── ...
/// ```
pub struct ContentCache {
    /// Root directory for cached content.
    cache_dir: PathBuf,
    /// Upstream source for uncached content.
    store: Arc<dyn RemoteStore>,
    /// Runtime handle for driving async retrievals from blocking
    /// filesystem request threads.
    runtime: Handle,
    /// Per-identifier locks serializing concurrent downloads.
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ContentCache {
    /// Create a cache rooted at a directory.
    ///
    /// Must be called from within a tokio runtime context; the handle
    /// captured here drives retrievals issued later from plain threads.
    ///
    /// # Arguments
    /// * `cache_dir` - Directory for cached content (created if needed)
    /// * `store` - Upstream store to fetch uncached content from
    pub fn new(cache_dir: impl Into<PathBuf>, store: Arc<dyn RemoteStore>) -> Result<Self, FsError> {
        let cache_dir: PathBuf = cache_dir.into();
        std::fs::create_dir_all(&cache_dir)?;

        let runtime: Handle = Handle::try_current()
            .map_err(|_| FsError::Runtime("no tokio runtime available".to_string()))?;

        Ok(Self {
            cache_dir,
            store,
            runtime,
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    /// Get the full content behind an identifier, fetching on a miss.
    ///
    /// A hit reads straight from disk. On a miss the identifier's
    /// download lock is taken, the disk is re-checked (another thread
    /// may have landed the content while waiting), and only then is the
    /// store asked. Fetched bytes are persisted before they are
    /// returned, so a crash never leaves a half-written cache file
    /// visible under the final name.
    ///
    /// # Arguments
    /// * `content_id` - Stable identifier of the content
    /// * `url` - Location to fetch from on a miss
    ///
    /// # Returns
    /// The complete content bytes.
    pub fn fetch(&self, content_id: &str, url: &str) -> Result<Vec<u8>, FsError> {
        if let Some(data) = self.read_cached(content_id)? {
            debug!(content_id, "cache hit");
            return Ok(data);
        }

        let slot: Arc<Mutex<()>> = self.fetch_slot(content_id);
        let _guard = slot.lock().unwrap();

        if let Some(data) = self.read_cached(content_id)? {
            debug!(content_id, "cache hit after waiting on in-flight fetch");
            return Ok(data);
        }

        debug!(content_id, url, "cache miss, retrieving");
        let data: Vec<u8> = match self.runtime.block_on(self.store.retrieve(content_id, url)) {
            Ok(data) => data,
            Err(err) => {
                warn!(content_id, url, error = %err, "content retrieval failed");
                return Err(err);
            }
        };

        self.persist(content_id, &data)?;
        debug!(content_id, bytes = data.len(), "cached content");
        Ok(data)
    }

    /// Check if content is cached.
    ///
    /// # Arguments
    /// * `content_id` - Identifier to check
    pub fn contains(&self, content_id: &str) -> bool {
        self.content_path(content_id).exists()
    }

    /// Get the cache directory path.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Read cached content from disk, None on a miss.
    fn read_cached(&self, content_id: &str) -> Result<Option<Vec<u8>>, FsError> {
        let path: PathBuf = self.content_path(content_id);

        if !path.exists() {
            return Ok(None);
        }

        let data: Vec<u8> = std::fs::read(&path)?;
        Ok(Some(data))
    }

    /// Store content atomically (temp file + rename).
    fn persist(&self, content_id: &str, data: &[u8]) -> Result<(), FsError> {
        let temp_path: PathBuf = self.temp_path(content_id);
        std::fs::write(&temp_path, data)?;
        std::fs::rename(&temp_path, self.content_path(content_id))?;
        Ok(())
    }

    /// Get the download lock for an identifier, creating it on first use.
    fn fetch_slot(&self, content_id: &str) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap();
        in_flight
            .entry(content_id.to_string())
            .or_default()
            .clone()
    }

    /// Get path for a content file.
    ///
    /// # Arguments
    /// * `content_id` - Content identifier
    fn content_path(&self, content_id: &str) -> PathBuf {
        self.cache_dir.join(content_id)
    }

    /// Get path for a temp file during atomic write.
    ///
    /// # Arguments
    /// * `content_id` - Content identifier
    fn temp_path(&self, content_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.tmp", content_id))
    }
}
