//! RemoteStore trait for content retrieval.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FsError;

/// Trait for types that can retrieve file content from upstream.
///
/// Implement this trait to integrate with different backends (HTTP,
/// memory, etc.). Implementations must be thread-safe: fetches are
/// issued from concurrent filesystem request threads.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Retrieve the entire content behind an identifier.
    ///
    /// # Arguments
    /// * `content_id` - Stable identifier of the content
    /// * `url` - Location the content is served from
    ///
    /// # Returns
    /// The raw bytes of the content.
    async fn retrieve(&self, content_id: &str, url: &str) -> Result<Vec<u8>, FsError>;
}

/// Remote store that fetches content over HTTP.
#[derive(Debug, Default)]
pub struct HttpStore {
    client: reqwest::Client,
}

impl HttpStore {
    /// Create a store with a fresh HTTP client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn retrieve(&self, content_id: &str, url: &str) -> Result<Vec<u8>, FsError> {
        debug!(content_id, url, "retrieving content over http");
        let response: reqwest::Response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|err| FsError::Fetch {
                    content_id: content_id.to_string(),
                    url: url.to_string(),
                    reason: err.to_string(),
                })?;

        let status: reqwest::StatusCode = response.status();
        if !status.is_success() {
            return Err(FsError::Fetch {
                content_id: content_id.to_string(),
                url: url.to_string(),
                reason: format!("unexpected status {status}"),
            });
        }

        let body = response.bytes().await.map_err(|err| FsError::Fetch {
            content_id: content_id.to_string(),
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        Ok(body.to_vec())
    }
}

/// In-memory remote store for testing.
///
/// Content is keyed by identifier; the URL is accepted but ignored.
/// Retrievals are counted so tests can assert how often the network
/// would have been hit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Content by identifier.
    content: RwLock<HashMap<String, Vec<u8>>>,
    /// Number of retrievals issued against this store.
    retrieve_count: AtomicU64,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add content to the store.
    ///
    /// # Arguments
    /// * `content_id` - Identifier the content is retrieved by
    /// * `data` - Content bytes
    pub fn insert(&self, content_id: impl Into<String>, data: Vec<u8>) {
        self.content
            .write()
            .unwrap()
            .insert(content_id.into(), data);
    }

    /// Number of retrievals performed so far.
    pub fn retrieve_count(&self) -> u64 {
        self.retrieve_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn retrieve(&self, content_id: &str, url: &str) -> Result<Vec<u8>, FsError> {
        self.retrieve_count.fetch_add(1, Ordering::SeqCst);
        self.content
            .read()
            .unwrap()
            .get(content_id)
            .cloned()
            .ok_or_else(|| FsError::Fetch {
                content_id: content_id.to_string(),
                url: url.to_string(),
                reason: "content not found in memory store".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_retrieve() {
        let store: MemoryStore = MemoryStore::new();
        store.insert("42", b"zip bytes".to_vec());

        let data: Vec<u8> = store
            .retrieve("42", "http://files.example/42")
            .await
            .unwrap();
        assert_eq!(data, b"zip bytes");
        assert_eq!(store.retrieve_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_not_found() {
        let store: MemoryStore = MemoryStore::new();
        let result: Result<Vec<u8>, FsError> =
            store.retrieve("nonexistent", "http://files.example/7").await;
        assert!(matches!(result, Err(FsError::Fetch { .. })));
        assert_eq!(store.retrieve_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_counts_every_retrieval() {
        let store: MemoryStore = MemoryStore::new();
        store.insert("42", b"data".to_vec());
        for _ in 0..3 {
            store
                .retrieve("42", "http://files.example/42")
                .await
                .unwrap();
        }
        assert_eq!(store.retrieve_count(), 3);
    }
}
