//! Error types for filesystem operations.

use thiserror::Error;

/// Errors that can occur while serving filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// No entry exists at the requested path
    #[error("No such entry: {path}")]
    NotFound { path: String },

    /// Content read attempted on a directory
    #[error("Is a directory: {path}")]
    IsDirectory { path: String },

    /// Remote content retrieval failed
    #[error("Fetch failed for content {content_id} from {url}: {reason}")]
    Fetch {
        content_id: String,
        url: String,
        reason: String,
    },

    /// Archive listing could not be parsed
    #[error("Malformed archive {path}: {reason}")]
    MalformedArchive { path: String, reason: String },

    /// Local cache I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No async runtime was available for remote fetches
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Mount operation failed
    #[error("Mount failed: {0}")]
    Mount(String),
}

impl FsError {
    /// Map the error to the errno reported to the kernel.
    pub fn errno(&self) -> i32 {
        match self {
            FsError::NotFound { .. } => libc::ENOENT,
            FsError::IsDirectory { .. } => libc::EISDIR,
            _ => libc::EIO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_mapping() {
        let not_found = FsError::NotFound {
            path: "/missing".to_string(),
        };
        assert_eq!(not_found.errno(), libc::ENOENT);

        let is_dir = FsError::IsDirectory {
            path: "/HW1".to_string(),
        };
        assert_eq!(is_dir.errno(), libc::EISDIR);

        let fetch = FsError::Fetch {
            content_id: "42".to_string(),
            url: "http://files.example/42".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(fetch.errno(), libc::EIO);
    }
}
