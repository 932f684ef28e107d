//! Deterministic, pure logic for roster reconciliation.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! rosters and remote listings and return deterministic outputs.

pub mod filter;
pub mod grouping;
pub mod refs;
pub mod types;
