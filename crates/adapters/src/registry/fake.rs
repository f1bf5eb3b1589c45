// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! In-memory coordination store used by engine and daemon tests.

use std::collections::{HashMap, HashSet};

use aim_core::{AimError, Instance, VersionKey};
use async_trait::async_trait;
use parking_lot::Mutex;

use super::RegistryClient;

#[derive(Default)]
struct Inner {
    entries: HashMap<(VersionKey, String, u16), String>,
    prefixes: HashSet<VersionKey>,
}

/// An in-memory stand-in for the cluster coordination store, scoped to one
/// node's IP the way `RegistryClient::list_local` is.
pub struct FakeRegistryClient {
    node_ip: String,
    inner: Mutex<Inner>,
}

impl FakeRegistryClient {
    pub fn new(node_ip: impl Into<String>) -> Self {
        Self { node_ip: node_ip.into(), inner: Mutex::new(Inner::default()) }
    }

    pub fn contains(&self, instance: &Instance) -> bool {
        let key = (instance.version_key(), self.node_ip.clone(), instance.port);
        self.inner.lock().entries.contains_key(&key)
    }

    pub fn entry_count_for_project(&self, version_key: &VersionKey) -> usize {
        self.inner.lock().entries.keys().filter(|(v, ..)| v == version_key).count()
    }
}

#[async_trait]
impl RegistryClient for FakeRegistryClient {
    async fn declare(&self, instance: &Instance) -> Result<(), AimError> {
        let mut inner = self.inner.lock();
        inner.prefixes.insert(instance.version_key());
        inner
            .entries
            .insert((instance.version_key(), self.node_ip.clone(), instance.port), instance.revision_key.revision_id.clone());
        Ok(())
    }

    async fn retract(&self, instance: &Instance) -> Result<(), AimError> {
        self.inner.lock().entries.remove(&(instance.version_key(), self.node_ip.clone(), instance.port));
        Ok(())
    }

    async fn list_local(&self) -> Result<HashSet<Instance>, AimError> {
        let inner = self.inner.lock();
        Ok(inner
            .entries
            .iter()
            .filter(|((_, ip, _), _)| ip == &self.node_ip)
            .map(|((version_key, _, port), revision_id)| {
                Instance::new(version_key.with_revision(revision_id.clone()), *port)
            })
            .collect())
    }

    async fn ensure_version_prefix(&self, version_key: &VersionKey) -> Result<(), AimError> {
        self.inner.lock().prefixes.insert(version_key.clone());
        Ok(())
    }
}
