// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Scans the OS process table for application-server processes that are
//! not known to the supervisor, and kills them.
//!
//! The supervisor is the source of truth for which instances should be
//! running; anything matching a runtime's process signature but absent
//! from the supervisor's own entry list is a rogue process left behind by
//! a prior crash or an unclean restart.

#[cfg(any(test, feature = "test-support"))]
mod fake;
mod sysinfo_table;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProcessTable;
pub use sysinfo_table::SysinfoProcessTable;

use std::collections::HashSet;

use aim_core::AimError;
use async_trait::async_trait;

/// An application-server process recognized from its command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessInfo {
    pub revision_id: String,
    pub port: u16,
    pub process_group: i32,
}

/// Recognizes and terminates application-server processes.
#[async_trait]
pub trait ProcessTable: Send + Sync {
    /// Returns every running process whose command line matches a known
    /// runtime's launch signature (Java's `com.google.appengine...` main
    /// class, or Python's `dev_appserver.py`), regardless of whether the
    /// supervisor knows about it.
    async fn scan(&self) -> Result<Vec<ProcessInfo>, AimError>;

    /// Sends `SIGKILL` to the process group of every scanned process whose
    /// `(revision_id, port)` pair is not in `monitored`.
    async fn kill_unmonitored(&self, monitored: &HashSet<(String, u16)>) -> Result<usize, AimError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
