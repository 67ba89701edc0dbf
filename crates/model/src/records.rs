//! Record types for the course dataset.
//!
//! The dataset is a JSON array of assignments produced by a separate
//! acquisition step against the course system's API. Only the fields
//! the filesystem consumes are typed here; every other upstream field
//! is preserved in `extra` so metadata documents can reproduce the
//! record as delivered.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One assignment with its submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Assignment name, used as its directory name under the root
    pub name: String,

    /// When the assignment was created
    #[serde(default)]
    pub created_at: Option<String>,

    /// When the assignment was last updated
    #[serde(default)]
    pub updated_at: Option<String>,

    /// Submissions fetched for this assignment, one per student
    #[serde(default, rename = "f_submissions")]
    pub submissions: Vec<Submission>,

    /// Remaining upstream fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One student's submission to an assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Student display name, used as the submission directory name
    pub student_name: String,

    /// When the most recent attempt was submitted; absent when the
    /// student never submitted
    #[serde(default)]
    pub submitted_at: Option<String>,

    /// Every submission attempt, oldest first
    #[serde(default)]
    pub submission_history: Vec<AttemptRecord>,

    /// Remaining upstream fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One attempt within a submission's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Attempt number, used as the attempt directory name. The course
    /// system emits a placeholder history row with a null attempt for
    /// students who never submitted.
    #[serde(default)]
    pub attempt: Option<i64>,

    /// When this attempt was submitted
    #[serde(default)]
    pub submitted_at: Option<String>,

    /// Files uploaded with this attempt
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,

    /// Remaining upstream fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One file uploaded with an attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRecord {
    /// Upstream identifier, used as the content cache key
    pub id: i64,

    /// Download URL for the file content
    pub url: String,

    /// File name, used as the entry name in the attempt directory
    pub filename: String,

    /// Size in bytes as reported upstream
    #[serde(default)]
    pub size: u64,

    /// When the file was last modified
    #[serde(default)]
    pub modified_at: Option<String>,

    /// Remaining upstream fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_minimal() {
        let json: &str = r#"{"name": "HW1"}"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.name, "HW1");
        assert!(assignment.created_at.is_none());
        assert!(assignment.submissions.is_empty());
        assert!(assignment.extra.is_empty());
    }

    #[test]
    fn test_assignment_extra_fields_preserved() {
        let json: &str = r#"{
            "name": "HW1",
            "points_possible": 100,
            "course_id": 7
        }"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.extra.len(), 2);
        assert_eq!(assignment.extra["points_possible"], 100);
        assert_eq!(assignment.extra["course_id"], 7);
    }

    #[test]
    fn test_submissions_key_is_renamed() {
        let json: &str = r#"{
            "name": "HW1",
            "f_submissions": [{"student_name": "Alice"}]
        }"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.submissions.len(), 1);
        assert_eq!(assignment.submissions[0].student_name, "Alice");
        // The typed field claims the key; it must not leak into extra.
        assert!(!assignment.extra.contains_key("f_submissions"));
    }

    #[test]
    fn test_null_attempt_decodes() {
        let json: &str = r#"{"attempt": null, "workflow_state": "unsubmitted"}"#;
        let record: AttemptRecord = serde_json::from_str(json).unwrap();
        assert!(record.attempt.is_none());
        assert_eq!(record.extra["workflow_state"], "unsubmitted");
    }

    #[test]
    fn test_attachment_defaults() {
        let json: &str = r#"{"id": 42, "url": "http://x/42", "filename": "code.zip"}"#;
        let record: AttachmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.size, 0);
        assert!(record.modified_at.is_none());
    }
}
