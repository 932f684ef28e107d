//! Reconciliation driver: LOAD → GROUP → QUERY → FILTER → PERSIST.
//!
//! Runs strictly sequentially. Each repository is queried once, with every
//! distinct branch the roster references for it, and the next query starts only
//! after the previous one returned.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::check::check_branches;
use crate::core::filter::{PresenceMap, judge, record_presence, survivors};
use crate::core::grouping::group_by_repository;
use crate::core::types::{FailurePolicy, Roster, RosterRecord, Verdict};
use crate::error::CheckError;
use crate::io::config::CheckConfig;
use crate::io::git::RefLister;
use crate::io::roster_store::{read_roster, write_roster};

/// Knobs for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    pub policy: FailurePolicy,
    /// Compute verdicts but never touch the roster file.
    pub dry_run: bool,
}

/// What happened to the roster file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Survivors were written to the temp file and renamed over the roster.
    Written,
    /// Nothing was dropped; the roster was left byte-identical.
    Unchanged,
    /// `dry_run` was set; the roster was not touched.
    DryRun,
}

/// Verdicts for one repository, in roster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReport {
    pub repository: String,
    pub verdicts: Vec<Verdict>,
    /// Remote failure that was tolerated under [`FailurePolicy::Lenient`].
    pub failure: Option<String>,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// One report per repository, first-seen order.
    pub repositories: Vec<RepositoryReport>,
    pub kept: usize,
    pub dropped: usize,
    pub persist: PersistOutcome,
}

impl ReconcileOutcome {
    /// Repositories whose listing failed and were treated as empty.
    pub fn failed_repositories(&self) -> impl Iterator<Item = &RepositoryReport> {
        self.repositories.iter().filter(|r| r.failure.is_some())
    }
}

/// Reconcile the roster named by `config` against the remote.
///
/// Under [`FailurePolicy::Strict`] the first remote failure aborts the run
/// before anything is written.
pub fn reconcile<L: RefLister + ?Sized>(
    config: &CheckConfig,
    lister: &L,
    options: &ReconcileOptions,
) -> Result<ReconcileOutcome, CheckError> {
    reconcile_with_progress(config, lister, options, |_| {})
}

/// Like [`reconcile`], calling `on_repository` as soon as each repository's
/// query has been answered (or tolerated as failed).
///
/// Reports already delivered stay delivered when a later repository aborts
/// the run.
#[instrument(
    skip_all,
    fields(
        roster = %config.roster_path.display(),
        policy = ?options.policy,
        dry_run = options.dry_run
    )
)]
pub fn reconcile_with_progress<L, F>(
    config: &CheckConfig,
    lister: &L,
    options: &ReconcileOptions,
    mut on_repository: F,
) -> Result<ReconcileOutcome, CheckError>
where
    L: RefLister + ?Sized,
    F: FnMut(&RepositoryReport),
{
    let roster = read_roster(&config.roster_path)?;

    // A scratch file left by an interrupted run must not outlive this one.
    remove_scratch(&config.temp_path);

    let groups = group_by_repository(&roster.records);
    debug!(
        repositories = groups.len(),
        records = roster.records.len(),
        "roster grouped"
    );

    let mut presence = PresenceMap::new();
    let mut repositories = Vec::with_capacity(groups.len());
    for group in &groups {
        info!(
            repository = %group.repository,
            branches = group.branches.len(),
            "checking repository"
        );
        let mut failure = None;
        match check_branches(lister, &group.repository, &group.branches) {
            Ok(results) => record_presence(&mut presence, &group.repository, results),
            Err(source) => match options.policy {
                FailurePolicy::Strict => {
                    return Err(CheckError::RemoteQuery {
                        repository: group.repository.clone(),
                        source,
                    });
                }
                FailurePolicy::Lenient => {
                    warn!(
                        repository = %group.repository,
                        err = %source,
                        "remote query failed, treating every branch as gone"
                    );
                    failure = Some(source.to_string());
                }
            },
        }

        let records: Vec<RosterRecord> = roster
            .records
            .iter()
            .filter(|r| r.repository == group.repository)
            .cloned()
            .collect();
        let report = RepositoryReport {
            repository: group.repository.clone(),
            verdicts: judge(&records, &presence),
            failure,
        };
        on_repository(&report);
        repositories.push(report);
    }

    let verdicts = judge(&roster.records, &presence);
    let kept = survivors(&verdicts);
    let dropped = verdicts.len() - kept.len();

    let persist = if options.dry_run {
        PersistOutcome::DryRun
    } else if dropped == 0 {
        debug!("nothing dropped, roster left untouched");
        PersistOutcome::Unchanged
    } else {
        let pruned = roster.with_records(kept.clone());
        persist_roster(&config.temp_path, &config.roster_path, &pruned)?;
        PersistOutcome::Written
    };

    info!(kept = kept.len(), dropped, ?persist, "reconciliation finished");
    Ok(ReconcileOutcome {
        repositories,
        kept: kept.len(),
        dropped,
        persist,
    })
}

/// Write `roster` to `temp_path`, then rename it over `roster_path`.
///
/// The original roster is only ever replaced by the rename. On any error the
/// temp file is removed.
pub(crate) fn persist_roster(
    temp_path: &Path,
    roster_path: &Path,
    roster: &Roster,
) -> Result<(), CheckError> {
    let mut scratch = ScratchFile::new(temp_path);
    write_roster(temp_path, roster)?;
    fs::rename(temp_path, roster_path).map_err(|source| CheckError::WriteFailed {
        path: roster_path.to_path_buf(),
        source,
    })?;
    scratch.keep();
    debug!(path = %roster_path.display(), "roster replaced");
    Ok(())
}

/// Removes the scratch file on drop unless [`ScratchFile::keep`] was called.
struct ScratchFile<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> ScratchFile<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn keep(&mut self) {
        self.armed = false;
    }
}

impl Drop for ScratchFile<'_> {
    fn drop(&mut self) {
        if self.armed {
            remove_scratch(self.path);
        }
    }
}

/// Best-effort removal of the scratch file; a missing file is fine.
fn remove_scratch(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed scratch file"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), err = %err, "failed to remove scratch file"),
    }
}
