//! Manifest loading: the list of datafile paths a session operates on.
//!
//! The manifest itself is plain text, one path per line; `file_id` is
//! assigned to each line by its 1-based position. Everything past this
//! point (argument parsing, prompting, a REPL) is an external collaborator.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read a manifest file into an ordered list of datafile paths.
///
/// `file_id` for the returned paths is implicit: the path at index `0`
/// is `file_id == 1`, the path at index `1` is `file_id == 2`, and so on.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::manifest(format!("cannot read manifest {}: {e}", path.display()))
    })?;

    Ok(contents
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .filter(|line| !line.is_empty())
        .collect())
}
