//! I/O helpers: settings, roster file, and the git subprocess.

pub mod config;
pub mod git;
pub mod remote_access;
pub mod roster_store;
