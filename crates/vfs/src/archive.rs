//! Archive expansion into the namespace.
//!
//! A remote zip attachment doubles as the root of a virtual subtree:
//! the first time its bytes are read, the archive is parsed and every
//! member lands in the namespace under a `<name>.unp` sibling
//! directory. Metadata traversal never triggers this, so directory
//! walkers cannot set off downloads; only an actual content read does.
//!
//! Expansion is all-or-nothing per attempt: members are decompressed
//! into memory first and the namespace is touched only afterwards. A
//! malformed archive is logged and left unexpanded, and the raw bytes
//! remain readable as a plain file.

use std::io::{Cursor, Read};
use std::path::{Component, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::entry::{ArchiveRootEntry, Entry, MemberDirEntry, MemberFileEntry, UnpackLog};
use crate::error::FsError;
use crate::namespace::Namespace;

/// Suffix appended to an archive path to name its expanded subtree.
pub const UNPACK_SUFFIX: &str = ".unp";

/// Check whether an attachment filename should be treated as an archive.
///
/// Detection is by filename alone. A mislabelled attachment simply
/// fails to parse on first read and keeps behaving as a plain file.
pub fn is_archive_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".zip")
}

/// Expand an archive into the namespace unless it already has been.
///
/// Safe to call from concurrent readers: a per-archive guard serializes
/// attempts, and the expanded flag is published only after the whole
/// member subtree is in place. A failed attempt leaves the flag clear,
/// so the next read retries.
///
/// # Arguments
/// * `namespace` - Tree the member subtree is inserted into
/// * `log` - Diagnostic log recording expanded member files
/// * `archive` - The archive root entry being read
/// * `data` - Complete raw bytes of the archive
pub fn ensure_expanded(
    namespace: &Namespace,
    log: &UnpackLog,
    archive: &ArchiveRootEntry,
    data: &[u8],
) {
    if archive.is_expanded() {
        return;
    }
    let _guard = archive.expansion_guard();
    if archive.is_expanded() {
        return;
    }

    match expand_into(namespace, log, archive, data) {
        Ok(members) => {
            info!(path = archive.file().path(), members, "expanded archive");
            archive.mark_expanded();
        }
        Err(err) => {
            warn!(path = archive.file().path(), error = %err, "archive expansion failed");
        }
    }
}

/// Parse the archive and insert its member subtree.
///
/// Returns the number of entries inserted, the `.unp` root included.
fn expand_into(
    namespace: &Namespace,
    log: &UnpackLog,
    archive: &ArchiveRootEntry,
    data: &[u8],
) -> Result<usize, FsError> {
    let path: &str = archive.file().path();
    let archive_mtime: SystemTime = archive.file().mtime();

    let mut zip = zip::ZipArchive::new(Cursor::new(data)).map_err(|err| {
        FsError::MalformedArchive {
            path: path.to_string(),
            reason: err.to_string(),
        }
    })?;

    // Decompress everything up front so the namespace lock is never
    // held across archive I/O.
    let unpack_root: String = format!("{path}{UNPACK_SUFFIX}");
    let mut members: Vec<Entry> = vec![Entry::MemberDir(MemberDirEntry::new(
        unpack_root.clone(),
        archive_mtime,
    ))];

    for index in 0..zip.len() {
        let mut member = match zip.by_index(index) {
            Ok(member) => member,
            Err(err) => {
                warn!(archive = path, index, error = %err, "skipping unreadable archive member");
                continue;
            }
        };

        let relative: String = match member_relative_path(member.enclosed_name()) {
            Some(relative) => relative,
            None => {
                warn!(archive = path, member = member.name(), "skipping member with unsafe name");
                continue;
            }
        };
        let member_path: String = format!("{unpack_root}/{relative}");
        let mtime: SystemTime = member_mtime(member.last_modified(), archive_mtime);

        if member.is_dir() {
            members.push(Entry::MemberDir(MemberDirEntry::new(member_path, mtime)));
        } else {
            let mut content: Vec<u8> = Vec::with_capacity(member.size() as usize);
            if let Err(err) = member.read_to_end(&mut content) {
                warn!(archive = path, member = %member_path, error = %err, "skipping member that failed to decompress");
                continue;
            }
            members.push(Entry::MemberFile(MemberFileEntry::new(
                member_path,
                content,
                mtime,
            )));
        }
    }

    let mut inserted: usize = 0;
    for member in members {
        let member_path: String = member.path().to_string();
        let is_file: bool = matches!(member, Entry::MemberFile(_));
        if namespace.insert(member) {
            inserted += 1;
            if is_file {
                log.record(member_path);
            }
        }
    }

    Ok(inserted)
}

/// Turn a sanitized member path into a slash-joined relative string.
///
/// `None` means the member name escaped the archive root (absolute or
/// `..`-containing) or was empty, and must be skipped.
fn member_relative_path(enclosed: Option<PathBuf>) -> Option<String> {
    let enclosed: PathBuf = enclosed?;
    let mut parts: Vec<String> = Vec::new();
    for component in enclosed.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            _ => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Convert a member's embedded timestamp, falling back to the
/// archive's own modification time.
fn member_mtime(modified: Option<zip::DateTime>, fallback: SystemTime) -> SystemTime {
    let timestamp = modified.and_then(|value| {
        let date = chrono::NaiveDate::from_ymd_opt(
            i32::from(value.year()),
            u32::from(value.month()),
            u32::from(value.day()),
        )?;
        let time = date.and_hms_opt(
            u32::from(value.hour()),
            u32::from(value.minute()),
            u32::from(value.second()),
        )?;
        let secs: i64 = time.and_utc().timestamp();
        if secs < 0 {
            return None;
        }
        Some(UNIX_EPOCH + Duration::from_secs(secs as u64))
    });
    timestamp.unwrap_or(fallback)
}
