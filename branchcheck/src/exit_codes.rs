//! Stable exit codes for the branchcheck CLI.

/// Roster reconciled (or already up to date).
pub const OK: i32 = 0;
/// Settings or roster missing/invalid. No remote call was made.
pub const INVALID: i32 = 1;
/// A remote listing failed under the strict policy. Roster untouched.
pub const REMOTE: i32 = 2;
/// The reconciled roster could not be written. Original roster intact.
pub const WRITE: i32 = 3;
