// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! In-memory stand-in for source fetch/extract used by engine tests.

use std::collections::HashSet;
use std::path::PathBuf;

use aim_core::{AimError, RevisionKey, Runtime};
use async_trait::async_trait;
use parking_lot::Mutex;

use super::SourceStore;

#[derive(Default)]
struct Inner {
    ensured: HashSet<String>,
    fail_urls: HashSet<String>,
    cleaned: Vec<HashSet<String>>,
}

/// Records `ensure`/`clean_old_revisions` calls without touching disk.
pub struct FakeSourceStore {
    root: PathBuf,
    inner: Mutex<Inner>,
}

impl FakeSourceStore {
    pub fn new() -> Self {
        Self { root: PathBuf::from("/fake-unpack-root"), inner: Mutex::new(Inner::default()) }
    }

    /// Makes `ensure` fail whenever it is called with this source URL.
    pub fn fail_url(&self, source_url: impl Into<String>) {
        self.inner.lock().fail_urls.insert(source_url.into());
    }

    pub fn is_ensured(&self, revision_key: &RevisionKey) -> bool {
        self.inner.lock().ensured.contains(&revision_key.to_string())
    }

    pub fn last_cleaned(&self) -> Option<HashSet<String>> {
        self.inner.lock().cleaned.last().cloned()
    }
}

impl Default for FakeSourceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceStore for FakeSourceStore {
    async fn ensure(&self, revision_key: &RevisionKey, source_url: &str, _runtime: Runtime) -> Result<(), AimError> {
        let mut inner = self.inner.lock();
        if inner.fail_urls.contains(source_url) {
            return Err(AimError::SourceStore(format!("fake fetch failure for {source_url}")));
        }
        inner.ensured.insert(revision_key.to_string());
        Ok(())
    }

    fn app_directory(&self, revision_key: &RevisionKey) -> PathBuf {
        self.root.join(revision_key.to_string()).join("app")
    }

    fn gopath_directory(&self, revision_key: &RevisionKey) -> PathBuf {
        self.root.join(revision_key.to_string()).join("gopath")
    }

    async fn clean_old_revisions(&self, active_revisions: &HashSet<String>) -> Result<(), AimError> {
        let mut inner = self.inner.lock();
        inner.ensured.retain(|key| active_revisions.contains(key));
        inner.cleaned.push(active_revisions.clone());
        Ok(())
    }
}
