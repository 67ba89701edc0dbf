//! Builder for constructing the namespace from a course dataset.

use std::sync::Arc;
use std::time::SystemTime;

use handinfs_model::{
    meta_document, parse_timestamp, Assignment, ASSIGNMENT_META_EXCLUDES, ATTEMPT_META_EXCLUDES,
    SUBMISSION_META_EXCLUDES,
};
use tracing::info;

use crate::archive::is_archive_name;
use crate::entry::{
    ArchiveRootEntry, DebugDocEntry, DirectoryEntry, Entry, MetaDocEntry, RemoteFileEntry,
    UnpackLog, DEBUG_DOC_PATH,
};
use crate::namespace::{join_path, Namespace, ROOT_PATH};

/// Name of the metadata document inside every dataset directory.
pub const META_NAME: &str = ".meta";

/// Build a namespace from decoded assignments.
///
/// One directory per assignment, per submitting student, and per
/// numbered attempt, each with a `.meta` document beside its children.
/// Attachments become remote files, zip attachments become archive
/// roots, and the diagnostics document lands at the tree root.
/// History rows without an attempt number are placeholders for
/// students who never submitted and produce no directory.
///
/// # Arguments
/// * `assignments` - Decoded dataset records
/// * `log` - Shared log that expansions will append to
///
/// # Returns
/// A namespace ready to mount.
pub fn build_namespace(assignments: &[Assignment], log: Arc<UnpackLog>) -> Namespace {
    let namespace: Namespace = Namespace::new();

    for assignment in assignments {
        let assignment_path: String = join_path(ROOT_PATH, &assignment.name);
        let created: SystemTime = parse_timestamp(assignment.created_at.as_deref());
        let updated: SystemTime = parse_timestamp(assignment.updated_at.as_deref());
        namespace.insert(Entry::Directory(DirectoryEntry::new(
            assignment_path.clone(),
            created,
        )));
        namespace.insert(Entry::MetaDoc(MetaDocEntry::new(
            join_path(&assignment_path, META_NAME),
            meta_document(assignment, ASSIGNMENT_META_EXCLUDES),
            updated,
        )));

        for submission in &assignment.submissions {
            let submission_path: String = join_path(&assignment_path, &submission.student_name);
            let submitted: SystemTime = parse_timestamp(submission.submitted_at.as_deref());
            namespace.insert(Entry::Directory(DirectoryEntry::new(
                submission_path.clone(),
                submitted,
            )));
            namespace.insert(Entry::MetaDoc(MetaDocEntry::new(
                join_path(&submission_path, META_NAME),
                meta_document(submission, SUBMISSION_META_EXCLUDES),
                submitted,
            )));

            for attempt in &submission.submission_history {
                let number: i64 = match attempt.attempt {
                    Some(number) => number,
                    None => continue,
                };
                let attempt_path: String = join_path(&submission_path, &number.to_string());
                let attempted: SystemTime = parse_timestamp(attempt.submitted_at.as_deref());
                namespace.insert(Entry::Directory(DirectoryEntry::new(
                    attempt_path.clone(),
                    attempted,
                )));
                namespace.insert(Entry::MetaDoc(MetaDocEntry::new(
                    join_path(&attempt_path, META_NAME),
                    meta_document(attempt, ATTEMPT_META_EXCLUDES),
                    attempted,
                )));

                for attachment in &attempt.attachments {
                    let file = RemoteFileEntry::new(
                        join_path(&attempt_path, &attachment.filename),
                        attachment.id.to_string(),
                        &attachment.url,
                        attachment.size,
                        parse_timestamp(attachment.modified_at.as_deref()),
                    );
                    if is_archive_name(&attachment.filename) {
                        namespace.insert(Entry::ArchiveRoot(ArchiveRootEntry::new(file)));
                    } else {
                        namespace.insert(Entry::RemoteFile(file));
                    }
                }
            }
        }
    }

    namespace.insert(Entry::DebugDoc(DebugDocEntry::new(DEBUG_DOC_PATH, log)));

    info!(
        assignments = assignments.len(),
        entries = namespace.len(),
        "namespace built"
    );
    namespace
}

#[cfg(test)]
mod tests {
    use super::*;
    use handinfs_model::decode_assignments;

    const DATASET: &str = r#"[
        {
            "name": "HW1",
            "created_at": "2024-02-01T09:00:00Z",
            "updated_at": "2024-02-20T09:00:00Z",
            "points_possible": 100,
            "f_studs": ["Alice", "Bob"],
            "f_submissions": [
                {
                    "student_name": "Alice",
                    "submitted_at": "2024-03-01T12:00:00Z",
                    "submission_history": [
                        {
                            "attempt": 1,
                            "submitted_at": "2024-03-01T12:00:00Z",
                            "attachments": [
                                {
                                    "id": 42,
                                    "url": "http://files.example/42",
                                    "filename": "code.zip",
                                    "size": 1234,
                                    "modified_at": "2024-03-01T11:59:00Z"
                                },
                                {
                                    "id": 7,
                                    "url": "http://files.example/7",
                                    "filename": "essay.pdf",
                                    "size": 9999,
                                    "modified_at": "2024-03-01T11:58:00Z"
                                }
                            ]
                        }
                    ]
                },
                {
                    "student_name": "Bob",
                    "submission_history": [
                        {"attempt": null, "workflow_state": "unsubmitted"}
                    ]
                }
            ]
        }
    ]"#;

    fn build() -> Namespace {
        let assignments: Vec<Assignment> = decode_assignments(DATASET).unwrap();
        build_namespace(&assignments, Arc::new(UnpackLog::new()))
    }

    #[test]
    fn test_builds_dataset_hierarchy() {
        let ns: Namespace = build();
        for path in [
            "/HW1",
            "/HW1/.meta",
            "/HW1/Alice",
            "/HW1/Alice/.meta",
            "/HW1/Alice/1",
            "/HW1/Alice/1/.meta",
            "/HW1/Alice/1/code.zip",
            "/HW1/Alice/1/essay.pdf",
        ] {
            assert!(ns.contains(path), "{path} should exist");
        }
    }

    #[test]
    fn test_zip_attachment_becomes_archive_root() {
        let ns: Namespace = build();
        let zip = ns.lookup("/HW1/Alice/1/code.zip").unwrap();
        assert!(matches!(zip.as_ref(), Entry::ArchiveRoot(_)));
        let pdf = ns.lookup("/HW1/Alice/1/essay.pdf").unwrap();
        assert!(matches!(pdf.as_ref(), Entry::RemoteFile(_)));
    }

    #[test]
    fn test_attachment_attributes_come_from_record() {
        let ns: Namespace = build();
        let pdf = ns.lookup("/HW1/Alice/1/essay.pdf").unwrap();
        let attrs = pdf.attributes();
        assert_eq!(attrs.size, 9999);
        assert_eq!(attrs.mtime, parse_timestamp(Some("2024-03-01T11:58:00Z")));
    }

    #[test]
    fn test_null_attempt_produces_no_directory() {
        let ns: Namespace = build();
        assert!(ns.contains("/HW1/Bob"));
        assert!(ns.contains("/HW1/Bob/.meta"));
        assert_eq!(ns.children_of("/HW1/Bob"), vec![".meta"]);
    }

    #[test]
    fn test_assignment_meta_is_filtered() {
        let ns: Namespace = build();
        let meta = ns.lookup("/HW1/.meta").unwrap();
        let content: Vec<u8> = match meta.as_ref() {
            Entry::MetaDoc(doc) => doc.content().to_vec(),
            other => panic!("expected a meta document, got {other:?}"),
        };
        let value: serde_json::Value = serde_json::from_slice(&content).unwrap();
        assert_eq!(value["name"], "HW1");
        assert_eq!(value["points_possible"], 100);
        assert!(value.get("f_submissions").is_none());
        assert!(value.get("f_studs").is_none());
    }

    #[test]
    fn test_submission_meta_drops_history() {
        let ns: Namespace = build();
        let meta = ns.lookup("/HW1/Alice/.meta").unwrap();
        let content: Vec<u8> = match meta.as_ref() {
            Entry::MetaDoc(doc) => doc.content().to_vec(),
            other => panic!("expected a meta document, got {other:?}"),
        };
        let value: serde_json::Value = serde_json::from_slice(&content).unwrap();
        assert_eq!(value["student_name"], "Alice");
        assert!(value.get("submission_history").is_none());
    }

    #[test]
    fn test_directory_timestamps_come_from_records() {
        let ns: Namespace = build();
        assert_eq!(
            ns.lookup("/HW1").unwrap().mtime(),
            parse_timestamp(Some("2024-02-01T09:00:00Z"))
        );
        assert_eq!(
            ns.lookup("/HW1/.meta").unwrap().mtime(),
            parse_timestamp(Some("2024-02-20T09:00:00Z"))
        );
        assert_eq!(
            ns.lookup("/HW1/Alice").unwrap().mtime(),
            parse_timestamp(Some("2024-03-01T12:00:00Z"))
        );
        // Bob never submitted; his directory sits at the epoch.
        assert_eq!(
            ns.lookup("/HW1/Bob").unwrap().mtime(),
            std::time::UNIX_EPOCH
        );
    }

    #[test]
    fn test_debug_doc_present_at_root() {
        let ns: Namespace = build();
        let doc = ns.lookup(DEBUG_DOC_PATH).unwrap();
        assert!(matches!(doc.as_ref(), Entry::DebugDoc(_)));
        let mut root_children: Vec<String> = ns.children_of("/");
        root_children.sort();
        assert_eq!(root_children, vec![".debuginfo.json", "HW1"]);
    }

    #[test]
    fn test_empty_dataset_builds_root_and_debug_doc() {
        let ns: Namespace = build_namespace(&[], Arc::new(UnpackLog::new()));
        assert_eq!(ns.len(), 2);
        assert!(ns.contains(DEBUG_DOC_PATH));
    }
}
