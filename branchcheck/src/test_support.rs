//! Test-only helpers: scripted remote listings and on-disk roster fixtures.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::types::RosterRecord;
use crate::error::RemoteError;
use crate::io::config::{CheckConfig, load_config};
use crate::io::git::RefLister;

/// Build a roster record.
pub fn record(repository: &str, branch: &str, owner: &str) -> RosterRecord {
    RosterRecord::new(repository, branch, owner)
}

/// Settings pointing at an unroutable remote; scripted listers never use it.
pub const FIXTURE_SETTINGS: &str = "\
# written by RosterFixture
ROSTER_PATH=roster.csv
GIT_USER=tester
GIT_TOKEN=not-a-real-token
GIT_BASE=127.0.0.1:9/git
";

#[derive(Debug, Clone)]
enum Script {
    Heads(Vec<String>),
    Failure(String),
}

/// [`RefLister`] with canned per-repository answers.
///
/// Repositories without a script list no heads. Only requested refs are
/// returned, matching `git ls-remote` pattern filtering. Every call is
/// recorded for later assertions.
#[derive(Debug, Default)]
pub struct ScriptedLister {
    scripts: HashMap<String, Script>,
    calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl ScriptedLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// `repository` has exactly these branches.
    pub fn with_heads(mut self, repository: &str, branches: &[&str]) -> Self {
        let heads = branches.iter().map(|b| b.to_string()).collect();
        self.scripts
            .insert(repository.to_string(), Script::Heads(heads));
        self
    }

    /// Listing `repository` fails with `stderr`.
    pub fn with_failure(mut self, repository: &str, stderr: &str) -> Self {
        self.scripts
            .insert(repository.to_string(), Script::Failure(stderr.to_string()));
        self
    }

    /// `(repository, requested refs)` for every call so far.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

impl RefLister for ScriptedLister {
    fn list_heads(&self, repository: &str, refs: &[String]) -> Result<String, RemoteError> {
        self.calls
            .borrow_mut()
            .push((repository.to_string(), refs.to_vec()));
        match self.scripts.get(repository) {
            Some(Script::Failure(stderr)) => Err(RemoteError::Failed {
                url: format!("scripted://{repository}"),
                status: "exit status: 128".to_string(),
                stderr: stderr.clone(),
            }),
            Some(Script::Heads(heads)) => Ok(heads
                .iter()
                .map(|head| format!("refs/heads/{head}"))
                .filter(|name| refs.contains(name))
                .enumerate()
                .map(|(idx, name)| format!("{idx:040x}\t{name}\n"))
                .collect()),
            None => Ok(String::new()),
        }
    }
}

/// Temp directory holding `roster.csv` and `branchcheck.conf`.
pub struct RosterFixture {
    temp: TempDir,
    pub settings_path: PathBuf,
    pub roster_path: PathBuf,
}

impl RosterFixture {
    pub fn new(roster: &str) -> Result<Self> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let settings_path = temp.path().join("branchcheck.conf");
        let roster_path = temp.path().join("roster.csv");
        fs::write(&settings_path, FIXTURE_SETTINGS).context("write settings")?;
        fs::write(&roster_path, roster).context("write roster")?;
        Ok(Self {
            temp,
            settings_path,
            roster_path,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn config(&self) -> Result<CheckConfig> {
        Ok(load_config(&self.settings_path)?)
    }

    pub fn roster_contents(&self) -> String {
        fs::read_to_string(&self.roster_path).unwrap_or_default()
    }

    pub fn temp_path(&self) -> PathBuf {
        self.root().join(crate::io::config::TEMP_FILE_NAME)
    }
}
