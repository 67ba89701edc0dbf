//! Synthetic entries generated by the filesystem itself.
//!
//! Two kinds of file exist without any upstream content: `.meta`
//! documents rendered from dataset records at build time, and the
//! diagnostics document at `/.debuginfo.json` listing every archive
//! member expanded so far.

use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// Path of the diagnostics document.
pub const DEBUG_DOC_PATH: &str = "/.debuginfo.json";

/// A pre-rendered metadata document.
#[derive(Debug)]
pub struct MetaDocEntry {
    path: String,
    content: Vec<u8>,
    mtime: SystemTime,
}

impl MetaDocEntry {
    /// Create a new metadata document entry.
    ///
    /// # Arguments
    /// * `path` - Absolute path of the document
    /// * `content` - Rendered document bytes
    /// * `mtime` - Modification time reported for the document
    pub fn new(path: impl Into<String>, content: Vec<u8>, mtime: SystemTime) -> Self {
        Self {
            path: path.into(),
            content,
            mtime,
        }
    }

    /// Get the absolute path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the rendered content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Get the modification time.
    pub fn mtime(&self) -> SystemTime {
        self.mtime
    }
}

/// Shared record of archive members inserted into the namespace.
///
/// Expansions append to it; the diagnostics document renders from it.
#[derive(Debug, Default)]
pub struct UnpackLog {
    paths: Mutex<Vec<String>>,
}

impl UnpackLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one expanded member path.
    pub fn record(&self, path: impl Into<String>) {
        self.paths.lock().unwrap().push(path.into());
    }

    /// Get a copy of every recorded path, in insertion order.
    pub fn snapshot(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    /// Number of recorded paths.
    pub fn len(&self) -> usize {
        self.paths.lock().unwrap().len()
    }

    /// Check whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The diagnostics document.
///
/// Size and content are regenerated on every request, so the document
/// always reflects the expansions performed so far in this session.
#[derive(Debug)]
pub struct DebugDocEntry {
    path: String,
    log: Arc<UnpackLog>,
    mtime: SystemTime,
}

impl DebugDocEntry {
    /// Create the diagnostics document entry.
    ///
    /// The modification time is fixed at creation, which in practice is
    /// when the filesystem was built.
    pub fn new(path: impl Into<String>, log: Arc<UnpackLog>) -> Self {
        Self {
            path: path.into(),
            log,
            mtime: SystemTime::now(),
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

    /// Render the current document.
    pub fn render(&self) -> Vec<u8> {
        let doc = serde_json::json!({ "unpacked_files": self.log.snapshot() });
        let mut rendered: String =
            serde_json::to_string_pretty(&doc).expect("JSON values must render");
        rendered.push('\n');
        rendered.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_doc_content() {
        let doc: MetaDocEntry = MetaDocEntry::new(
            "/HW1/.meta",
            b"{}\n".to_vec(),
            SystemTime::UNIX_EPOCH,
        );
        assert_eq!(doc.content(), b"{}\n");
        assert_eq!(doc.path(), "/HW1/.meta");
    }

    #[test]
    fn test_unpack_log_records_in_order() {
        let log: UnpackLog = UnpackLog::new();
        assert!(log.is_empty());
        log.record("/a.zip.unp/one");
        log.record("/a.zip.unp/two");
        assert_eq!(log.len(), 2);
        assert_eq!(log.snapshot(), vec!["/a.zip.unp/one", "/a.zip.unp/two"]);
    }

    #[test]
    fn test_debug_doc_renders_empty_log() {
        let doc: DebugDocEntry =
            DebugDocEntry::new("/.debuginfo.json", Arc::new(UnpackLog::new()));
        let body: String = String::from_utf8(doc.render()).unwrap();
        assert_eq!(body, "{\n  \"unpacked_files\": []\n}\n");
    }

    #[test]
    fn test_debug_doc_reflects_later_records() {
        let log: Arc<UnpackLog> = Arc::new(UnpackLog::new());
        let doc: DebugDocEntry = DebugDocEntry::new("/.debuginfo.json", log.clone());
        let before: Vec<u8> = doc.render();
        log.record("/HW1/Alice/1/code.zip.unp/main.rs");
        let after: Vec<u8> = doc.render();
        assert_ne!(before, after);
        let body: String = String::from_utf8(after).unwrap();
        assert!(body.contains("/HW1/Alice/1/code.zip.unp/main.rs"));
    }
}
