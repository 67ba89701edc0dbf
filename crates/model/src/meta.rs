//! Rendering of `.meta` documents.
//!
//! Every directory level of the mounted tree exposes a `.meta` file
//! holding the upstream record for that level, pretty-printed with a
//! fixed set of bulky keys removed. Assignment documents drop the
//! student roster and the submission array, submission documents drop
//! the attempt history, and attempt documents are rendered in full.

use serde::Serialize;
use serde_json::Value;

/// Keys removed from assignment-level metadata documents.
pub const ASSIGNMENT_META_EXCLUDES: &[&str] = &["f_studs", "f_submissions"];

/// Keys removed from submission-level metadata documents.
pub const SUBMISSION_META_EXCLUDES: &[&str] = &["submission_history"];

/// Attempt-level metadata documents keep every key.
pub const ATTEMPT_META_EXCLUDES: &[&str] = &[];

/// Render a record as a metadata document.
///
/// The output is pretty-printed JSON with keys in sorted order,
/// terminated by a newline, so the document is byte-stable across runs.
///
/// # Arguments
/// * `record` - The record to render
/// * `exclude` - Top-level keys to remove before rendering
pub fn meta_document<T: Serialize>(record: &T, exclude: &[&str]) -> Vec<u8> {
    let mut value: Value =
        serde_json::to_value(record).expect("dataset records must serialize to JSON");
    if let Value::Object(ref mut map) = value {
        for key in exclude {
            map.remove(*key);
        }
    }
    let mut rendered: String =
        serde_json::to_string_pretty(&value).expect("JSON values must render");
    rendered.push('\n');
    rendered.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Assignment, Submission};

    fn sample_assignment() -> Assignment {
        let json: &str = r#"{
            "name": "HW1",
            "created_at": "2024-02-01T09:00:00Z",
            "updated_at": "2024-02-02T09:00:00Z",
            "points_possible": 100,
            "f_studs": ["Alice", "Bob"],
            "f_submissions": [{"student_name": "Alice"}]
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_assignment_excludes_bulky_keys() {
        let assignment: Assignment = sample_assignment();
        let doc: String =
            String::from_utf8(meta_document(&assignment, ASSIGNMENT_META_EXCLUDES)).unwrap();
        assert!(doc.contains("\"name\": \"HW1\""));
        assert!(doc.contains("\"points_possible\": 100"));
        assert!(!doc.contains("f_studs"));
        assert!(!doc.contains("f_submissions"));
    }

    #[test]
    fn test_document_ends_with_newline() {
        let assignment: Assignment = sample_assignment();
        let doc: Vec<u8> = meta_document(&assignment, ASSIGNMENT_META_EXCLUDES);
        assert_eq!(doc.last(), Some(&b'\n'));
    }

    #[test]
    fn test_keys_are_sorted() {
        let assignment: Assignment = sample_assignment();
        let doc: String =
            String::from_utf8(meta_document(&assignment, ASSIGNMENT_META_EXCLUDES)).unwrap();
        let created: usize = doc.find("created_at").unwrap();
        let name: usize = doc.find("\"name\"").unwrap();
        let points: usize = doc.find("points_possible").unwrap();
        assert!(created < name);
        assert!(name < points);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let assignment: Assignment = sample_assignment();
        let first: Vec<u8> = meta_document(&assignment, ASSIGNMENT_META_EXCLUDES);
        let second: Vec<u8> = meta_document(&assignment, ASSIGNMENT_META_EXCLUDES);
        assert_eq!(first, second);
    }

    #[test]
    fn test_submission_excludes_history() {
        let json: &str = r#"{
            "student_name": "Alice",
            "submitted_at": null,
            "grade": "B+",
            "submission_history": [{"attempt": 1}]
        }"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        let doc: String =
            String::from_utf8(meta_document(&submission, SUBMISSION_META_EXCLUDES)).unwrap();
        assert!(doc.contains("\"student_name\": \"Alice\""));
        assert!(doc.contains("\"grade\": \"B+\""));
        // Null values stay visible; only the excluded key disappears.
        assert!(doc.contains("\"submitted_at\": null"));
        assert!(!doc.contains("submission_history"));
    }

    #[test]
    fn test_empty_exclude_list_keeps_all_keys() {
        let assignment: Assignment = sample_assignment();
        let doc: String = String::from_utf8(meta_document(&assignment, &[])).unwrap();
        assert!(doc.contains("f_studs"));
        assert!(doc.contains("f_submissions"));
    }
}
