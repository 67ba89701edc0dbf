//! Course dataset model for handinfs.
//!
//! This crate provides the record types a course dataset file decodes
//! into, plus the two derived views the filesystem needs:
//! - `time` - dataset timestamps parsed into `SystemTime` attributes
//! - `meta` - filtered `.meta` documents for per-directory metadata
//!
//! The dataset itself is produced ahead of time by an acquisition step
//! and placed at `<cache_dir>/assignments.json`. Its shape is one JSON
//! array element per assignment, each carrying its submissions, their
//! attempt histories, and the attachments uploaded with each attempt.

pub mod error;
pub mod meta;
pub mod records;
pub mod time;

mod decode;

pub use decode::{decode_assignments, load_assignments};
pub use error::ModelError;
pub use meta::{
    meta_document, ASSIGNMENT_META_EXCLUDES, ATTEMPT_META_EXCLUDES, SUBMISSION_META_EXCLUDES,
};
pub use records::{Assignment, AttachmentRecord, AttemptRecord, Submission};
pub use time::parse_timestamp;
