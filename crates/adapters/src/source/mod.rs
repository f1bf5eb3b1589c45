// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Fetches, extracts, and garbage-collects revision source code.
//!
//! Construction of the on-disk layout itself (the *source store*) is named
//! out of scope for the core lifecycle engine; this module only defines the
//! narrow interface the engine calls through — `ensure` before starting a
//! watch (invariant I4) and `clean_old_revisions` after a stop completes.

mod fs;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use fs::FsSourceStore;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSourceStore;

use std::collections::HashSet;
use std::path::PathBuf;

use aim_core::{AimError, RevisionKey, Runtime};
use async_trait::async_trait;

/// Fetches and extracts application source archives, keyed by revision.
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Ensures the source for `revision_key` is present on disk, fetching
    /// and extracting `source_url` if it is not. Must complete before the
    /// caller starts the corresponding watch.
    async fn ensure(&self, revision_key: &RevisionKey, source_url: &str, runtime: Runtime) -> Result<(), AimError>;

    /// Returns the directory the application's source lives in once
    /// `ensure` has completed for this revision.
    fn app_directory(&self, revision_key: &RevisionKey) -> PathBuf;

    /// Returns the Go build workspace directory for a revision. Only
    /// meaningful when the revision's runtime is Go.
    fn gopath_directory(&self, revision_key: &RevisionKey) -> PathBuf;

    /// Removes source directories for revisions not in `active_revisions`.
    async fn clean_old_revisions(&self, active_revisions: &HashSet<String>) -> Result<(), AimError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
