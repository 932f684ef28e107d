//! Roster branch checker.
//!
//! Reads a `repository,branch,owner` roster, asks each repository's remote
//! which of those branches still exist, and rewrites the roster without the
//! ones that are gone.

use std::path::PathBuf;

use anyhow::Result;
use branchcheck::core::types::FailurePolicy;
use branchcheck::error::CheckError;
use branchcheck::exit_codes;
use branchcheck::io::config::{DEFAULT_SETTINGS_FILE, load_config};
use branchcheck::io::git::GitRemote;
use branchcheck::logging;
use branchcheck::reconcile::{
    PersistOutcome, ReconcileOptions, ReconcileOutcome, RepositoryReport, reconcile_with_progress,
};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(
    name = "branchcheck",
    version,
    about = "Prune roster entries whose branch no longer exists on the remote"
)]
struct Cli {
    /// KEY=VALUE settings file (ROSTER_PATH, GIT_USER, GIT_TOKEN, GIT_BASE).
    #[arg(
        short,
        long,
        env = "BRANCHCHECK_SETTINGS",
        default_value = DEFAULT_SETTINGS_FILE
    )]
    settings: PathBuf,

    /// What to do when a repository cannot be listed.
    #[arg(long, value_enum, default_value_t = Policy::Strict)]
    policy: Policy,

    /// Report what would be pruned without rewriting the roster.
    #[arg(long)]
    dry_run: bool,

    /// Emit debug diagnostics on stderr (ignored when RUST_LOG is set).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Abort without touching the roster.
    Strict,
    /// Treat the repository as empty and keep going (drops its entries).
    Lenient,
}

impl From<Policy> for FailurePolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Strict => FailurePolicy::Strict,
            Policy::Lenient => FailurePolicy::Lenient,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let code = match run(&cli) {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            err.downcast_ref::<CheckError>()
                .map_or(exit_codes::INVALID, CheckError::exit_code)
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.settings)?;
    let git = GitRemote::new(&config.remote);
    let options = ReconcileOptions {
        policy: cli.policy.into(),
        dry_run: cli.dry_run,
    };
    let outcome = reconcile_with_progress(&config, &git, &options, print_repository)?;
    print_summary(&outcome);
    Ok(())
}

fn print_repository(report: &RepositoryReport) {
    println!("\nChecking branches for repository: {}", report.repository);
    if let Some(failure) = &report.failure {
        println!(
            "WARNING: could not list {} ({failure}); dropping all of its entries",
            report.repository
        );
    }
    for verdict in &report.verdicts {
        if verdict.exists {
            println!("{} still exists!", verdict.record);
        } else {
            println!("{} is gone", verdict.record);
        }
    }
}

fn print_summary(outcome: &ReconcileOutcome) {
    match outcome.persist {
        PersistOutcome::Written => println!(
            "Roster updated successfully ({} kept, {} removed).",
            outcome.kept, outcome.dropped
        ),
        PersistOutcome::Unchanged => {
            println!("Roster up to date ({} entries kept).", outcome.kept);
        }
        PersistOutcome::DryRun => println!(
            "Dry run: {} entries would be kept, {} removed. Roster not modified.",
            outcome.kept, outcome.dropped
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_strict_policy() {
        let cli = Cli::parse_from(["branchcheck", "--settings", "x.conf"]);
        assert_eq!(cli.policy, Policy::Strict);
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
        assert_eq!(cli.settings, PathBuf::from("x.conf"));
    }

    #[test]
    fn parses_lenient_dry_run() {
        let cli = Cli::parse_from([
            "branchcheck",
            "--settings",
            "x.conf",
            "--policy",
            "lenient",
            "--dry-run",
            "-v",
        ]);
        assert_eq!(FailurePolicy::from(cli.policy), FailurePolicy::Lenient);
        assert!(cli.dry_run);
        assert!(cli.verbose);
    }
}
