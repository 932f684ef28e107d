//! Roster load/save.
//!
//! Format: first line is an opaque header, every other line is
//! `repository,branch,owner`. No quoting, so fields cannot contain commas.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::core::types::{Roster, RosterRecord};
use crate::error::CheckError;

/// Load the roster at `path`.
///
/// Fails with [`CheckError::RosterMissing`] when the file does not exist,
/// checked before any read is attempted.
pub fn read_roster(path: &Path) -> Result<Roster, CheckError> {
    if !path.exists() {
        return Err(CheckError::RosterMissing {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path).map_err(|source| CheckError::RosterRead {
        path: path.to_path_buf(),
        source,
    })?;
    let roster =
        parse_roster(&contents).map_err(|(line, message)| CheckError::RosterMalformed {
            path: path.to_path_buf(),
            line,
            message,
        })?;
    debug!(path = %path.display(), records = roster.records.len(), "roster loaded");
    Ok(roster)
}

/// Overwrite `path` with the rendered roster.
pub fn write_roster(path: &Path, roster: &Roster) -> Result<(), CheckError> {
    debug!(path = %path.display(), records = roster.records.len(), "writing roster");
    fs::write(path, roster.render()).map_err(|source| CheckError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse roster text. Errors carry the 1-based line number.
pub fn parse_roster(contents: &str) -> Result<Roster, (usize, String)> {
    let trailing_newline = contents.ends_with('\n');
    let trimmed = contents.trim();

    let mut lines = trimmed.split('\n');
    let header = lines.next().unwrap_or_default().to_string();
    let mut records = Vec::new();
    for (idx, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_record(line).map_err(|msg| (idx + 2, msg))?);
    }

    Ok(Roster {
        header,
        records,
        trailing_newline,
    })
}

fn parse_record(line: &str) -> Result<RosterRecord, String> {
    let fields: Vec<&str> = line.split(',').collect();
    match fields.as_slice() {
        [repository, branch, owner] => Ok(RosterRecord::new(*repository, *branch, *owner)),
        _ => Err(format!(
            "expected 3 comma-separated fields (repository,branch,owner), found {}: '{line}'",
            fields.len()
        )),
    }
}
