//! Prune a roster of tracked branches against what still exists on the remote.
//!
//! The roster is a small CSV of `repository,branch,owner` lines. A run loads
//! it, groups records by repository, asks `git ls-remote` once per repository
//! which of the listed branches still exist, and atomically rewrites the roster
//! with only the survivors.
//!
//! - **[`core`]**: Pure, deterministic logic (grouping, ref parsing, filtering).
//! - **[`io`]**: Settings, roster file and the `git` subprocess.
//!
//! [`check`] and [`reconcile`] coordinate the two to implement the CLI.

pub mod check;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod reconcile;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
