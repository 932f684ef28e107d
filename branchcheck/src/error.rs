//! Error kinds surfaced by a reconciliation run.

use std::path::PathBuf;

use thiserror::Error;

use crate::exit_codes;

/// Failure of a single remote listing.
///
/// Messages never contain the remote credential: URLs are redacted and
/// captured stderr is scrubbed before it is stored here.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The authenticated URL for the repository could not be built.
    #[error("invalid remote url {url}")]
    InvalidUrl { url: String },

    /// `git` could not be started at all.
    #[error("failed to spawn git: {0}")]
    Spawn(#[source] std::io::Error),

    /// `git ls-remote` ran but exited unsuccessfully.
    #[error("git ls-remote {url} exited with {status}: {stderr}")]
    Failed {
        url: String,
        status: String,
        stderr: String,
    },
}

/// All fatal errors of a run, each mapped to a stable exit code.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("settings file {path} not found")]
    ConfigMissing { path: PathBuf },

    #[error("settings file {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    #[error("settings file {path} is missing required key {key}")]
    ConfigKeyMissing { path: PathBuf, key: &'static str },

    #[error("roster file {path} not found")]
    RosterMissing { path: PathBuf },

    #[error("read roster {path}")]
    RosterRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("roster {path} line {line}: {message}")]
    RosterMalformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("remote query failed for repository {repository}")]
    RemoteQuery {
        repository: String,
        #[source]
        source: RemoteError,
    },

    #[error("write roster {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CheckError {
    /// Process exit code for this error (see [`exit_codes`]).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigMissing { .. }
            | Self::ConfigInvalid { .. }
            | Self::ConfigKeyMissing { .. }
            | Self::RosterMissing { .. }
            | Self::RosterRead { .. }
            | Self::RosterMalformed { .. } => exit_codes::INVALID,
            Self::RemoteQuery { .. } => exit_codes::REMOTE,
            Self::WriteFailed { .. } => exit_codes::WRITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failure_names_repository_and_cause() {
        let err = CheckError::RemoteQuery {
            repository: "team/app".to_string(),
            source: RemoteError::Failed {
                url: "https://alice@git.example.com/team/app".to_string(),
                status: "exit status: 128".to_string(),
                stderr: "fatal: unable to access".to_string(),
            },
        };
        assert_eq!(err.exit_code(), exit_codes::REMOTE);
        let chain = format!("{:#}", anyhow::Error::new(err));
        assert!(chain.contains("team/app"));
        assert!(chain.contains("unable to access"));
    }

    #[test]
    fn config_and_roster_errors_are_invalid() {
        let err = CheckError::RosterMissing {
            path: PathBuf::from("roster.csv"),
        };
        assert_eq!(err.exit_code(), exit_codes::INVALID);
        let err = CheckError::ConfigKeyMissing {
            path: PathBuf::from("branchcheck.conf"),
            key: "GIT_USER",
        };
        assert_eq!(err.exit_code(), exit_codes::INVALID);
    }
}
