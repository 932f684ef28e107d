//! Settings loaded from a `KEY=VALUE` file.
//!
//! ```text
//! # branchcheck.conf
//! ROSTER_PATH=/checkbranches/branchlist.csv
//! GIT_USER=my-user
//! GIT_TOKEN=my-password
//! GIT_BASE=example.com/path/to/git
//! ```
//!
//! Blank lines and `#` comments are skipped. Lines are split on the first `=`
//! only, so values may contain `=`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{debug, warn};

use super::remote_access::RemoteAccess;
use crate::error::CheckError;

/// Settings file used when neither `--settings` nor `BRANCHCHECK_SETTINGS` is given.
pub const DEFAULT_SETTINGS_FILE: &str = "branchcheck.conf";

/// Fixed name of the scratch file written next to the roster.
pub const TEMP_FILE_NAME: &str = "tempfile.csv";

pub const KEY_ROSTER_PATH: &str = "ROSTER_PATH";
pub const KEY_GIT_USER: &str = "GIT_USER";
pub const KEY_GIT_TOKEN: &str = "GIT_TOKEN";
pub const KEY_GIT_BASE: &str = "GIT_BASE";

const KNOWN_KEYS: [&str; 4] = [KEY_ROSTER_PATH, KEY_GIT_USER, KEY_GIT_TOKEN, KEY_GIT_BASE];

/// Configuration for one run, built once at startup and passed by reference.
#[derive(Debug)]
pub struct CheckConfig {
    pub roster_path: PathBuf,
    /// Same directory as the roster, named [`TEMP_FILE_NAME`].
    pub temp_path: PathBuf,
    pub remote: RemoteAccess,
}

impl CheckConfig {
    pub fn new(roster_path: impl Into<PathBuf>, remote: RemoteAccess) -> Self {
        let roster_path = roster_path.into();
        let temp_path = temp_path_for(&roster_path);
        Self {
            roster_path,
            temp_path,
            remote,
        }
    }
}

/// Scratch path derived from the roster path.
pub fn temp_path_for(roster_path: &Path) -> PathBuf {
    match roster_path.parent() {
        Some(dir) => dir.join(TEMP_FILE_NAME),
        None => PathBuf::from(TEMP_FILE_NAME),
    }
}

/// Load and validate the settings file at `path`.
///
/// A relative `ROSTER_PATH` is resolved against the settings file's directory.
pub fn load_config(path: &Path) -> Result<CheckConfig, CheckError> {
    if !path.exists() {
        return Err(CheckError::ConfigMissing {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path).map_err(|err| CheckError::ConfigInvalid {
        path: path.to_path_buf(),
        message: format!("unreadable: {err}"),
    })?;
    let mut settings = parse_settings(&contents).map_err(|message| CheckError::ConfigInvalid {
        path: path.to_path_buf(),
        message,
    })?;

    for key in settings.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn!(key = %key, path = %path.display(), "ignoring unknown settings key");
        }
    }

    let mut required = |key: &'static str| {
        settings
            .remove(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| CheckError::ConfigKeyMissing {
                path: path.to_path_buf(),
                key,
            })
    };
    let roster = required(KEY_ROSTER_PATH)?;
    let user = required(KEY_GIT_USER)?;
    let token = SecretString::from(required(KEY_GIT_TOKEN)?);
    let base = required(KEY_GIT_BASE)?;

    let invalid = |message: String| CheckError::ConfigInvalid {
        path: path.to_path_buf(),
        message,
    };
    let remote = RemoteAccess::new(&base, user, token).map_err(invalid)?;

    let mut roster_path = PathBuf::from(roster);
    if roster_path.is_relative()
        && let Some(dir) = path.parent()
    {
        roster_path = dir.join(roster_path);
    }
    if roster_path.file_name().is_some_and(|name| name == TEMP_FILE_NAME) {
        return Err(invalid(format!(
            "{KEY_ROSTER_PATH} must not be named {TEMP_FILE_NAME} (reserved for the scratch file)"
        )));
    }

    let cfg = CheckConfig::new(roster_path, remote);
    debug!(
        roster = %cfg.roster_path.display(),
        temp = %cfg.temp_path.display(),
        user = cfg.remote.username(),
        "settings loaded"
    );
    Ok(cfg)
}

/// Parse `KEY=VALUE` lines. Later duplicates override earlier ones.
pub fn parse_settings(contents: &str) -> Result<HashMap<String, String>, String> {
    let mut settings = HashMap::new();
    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(format!("line {}: expected KEY=VALUE", idx + 1));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("line {}: empty key", idx + 1));
        }
        settings.insert(key.to_string(), value.trim().to_string());
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "\
# roster audit
ROSTER_PATH=roster.csv

GIT_USER=alice
GIT_TOKEN=abc=def==
GIT_BASE=git.example.com/scm
";

    #[test]
    fn splits_on_first_equals_and_skips_comments() {
        let settings = parse_settings(VALID).expect("parse");
        assert_eq!(settings.len(), 4);
        assert_eq!(settings["GIT_TOKEN"], "abc=def==");
        assert_eq!(settings["ROSTER_PATH"], "roster.csv");
    }

    #[test]
    fn line_without_equals_is_rejected() {
        let err = parse_settings("GIT_USER=alice\nnonsense\n").unwrap_err();
        assert!(err.contains("line 2"));
    }

    #[test]
    fn load_resolves_roster_next_to_settings() {
        let temp = tempfile::tempdir().expect("tempdir");
        let settings = temp.path().join("branchcheck.conf");
        fs::write(&settings, VALID).expect("write settings");

        let cfg = load_config(&settings).expect("load");
        assert_eq!(cfg.roster_path, temp.path().join("roster.csv"));
        assert_eq!(cfg.temp_path, temp.path().join(TEMP_FILE_NAME));
        assert_eq!(
            cfg.remote.redacted_url("app"),
            "https://alice@git.example.com/scm/app"
        );
    }

    #[test]
    fn load_missing_file_is_config_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_config(&temp.path().join("absent.conf")).unwrap_err();
        assert!(matches!(err, CheckError::ConfigMissing { .. }));
    }

    #[test]
    fn missing_or_empty_key_is_reported_by_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        let settings = temp.path().join("branchcheck.conf");
        fs::write(
            &settings,
            "ROSTER_PATH=roster.csv\nGIT_USER=alice\nGIT_TOKEN=\nGIT_BASE=h\n",
        )
        .expect("write settings");

        let err = load_config(&settings).unwrap_err();
        assert!(matches!(
            err,
            CheckError::ConfigKeyMissing {
                key: KEY_GIT_TOKEN,
                ..
            }
        ));
    }

    #[test]
    fn roster_named_like_scratch_file_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let settings = temp.path().join("branchcheck.conf");
        fs::write(
            &settings,
            "ROSTER_PATH=tempfile.csv\nGIT_USER=a\nGIT_TOKEN=t\nGIT_BASE=h\n",
        )
        .expect("write settings");
        let err = load_config(&settings).unwrap_err();
        assert!(matches!(err, CheckError::ConfigInvalid { .. }));
    }
}
