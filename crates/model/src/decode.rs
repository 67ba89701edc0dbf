//! Dataset decoding.

use std::path::Path;

use crate::error::ModelError;
use crate::records::Assignment;

/// Decode a course dataset from its JSON text.
///
/// The dataset is a JSON array with one element per assignment.
///
/// # Arguments
/// * `json` - JSON string to parse
///
/// # Returns
/// The decoded assignments, or an error if parsing fails
pub fn decode_assignments(json: &str) -> Result<Vec<Assignment>, ModelError> {
    let assignments: Vec<Assignment> = serde_json::from_str(json)?;
    Ok(assignments)
}

/// Load and decode a course dataset from a file.
///
/// # Arguments
/// * `path` - Dataset location, conventionally `<cache_dir>/assignments.json`
pub fn load_assignments(path: &Path) -> Result<Vec<Assignment>, ModelError> {
    let json: String =
        std::fs::read_to_string(path).map_err(|source| ModelError::DatasetRead {
            path: path.display().to_string(),
            source,
        })?;
    decode_assignments(&json)
}
