//! Shared deterministic types for roster reconciliation.
//!
//! These types carry no I/O and no credentials; they are the contract between
//! the roster store, the remote checker and the reconciliation driver.

use std::fmt;

/// One tracked `(repository, branch, owner)` line of the roster.
///
/// Identity is the ordered triple. Duplicates are legal and kept independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RosterRecord {
    pub repository: String,
    pub branch: String,
    pub owner: String,
}

impl RosterRecord {
    pub fn new(
        repository: impl Into<String>,
        branch: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.into(),
            owner: owner.into(),
        }
    }

    /// Serialize as a single roster line (no trailing newline).
    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.repository, self.branch, self.owner)
    }
}

impl fmt::Display for RosterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repository, self.branch)
    }
}

/// Parsed roster file: opaque header plus records in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    /// First line of the file, passed through byte-for-byte.
    pub header: String,
    pub records: Vec<RosterRecord>,
    /// Whether the source file ended with `\n`.
    pub trailing_newline: bool,
}

impl Roster {
    /// Same header and newline convention, different records.
    pub fn with_records(&self, records: Vec<RosterRecord>) -> Self {
        Self {
            header: self.header.clone(),
            records,
            trailing_newline: self.trailing_newline,
        }
    }

    /// Render the file contents exactly as they will be written to disk.
    pub fn render(&self) -> String {
        let mut out = self.header.clone();
        for record in &self.records {
            out.push('\n');
            out.push_str(&record.to_line());
        }
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}

/// Distinct branch names referenced for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryGroup {
    pub repository: String,
    /// Distinct branch names, first-seen order.
    pub branches: Vec<String>,
}

/// Remote answer for one queried branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePresence {
    pub branch: String,
    pub exists: bool,
}

/// What to do when the remote listing for a repository fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole run and leave the roster untouched.
    #[default]
    Strict,
    /// Treat the repository as having no branches and keep going.
    ///
    /// A transient outage drops every record of that repository.
    Lenient,
}

/// Per-record outcome of the filter step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub record: RosterRecord,
    pub exists: bool,
}
