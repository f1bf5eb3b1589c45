// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Client for the cluster-shared coordination store that advertises
//! instances to routers.

mod http;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use http::HttpRegistryClient;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeRegistryClient;

use std::collections::HashSet;

use aim_core::{AimError, Instance};
use async_trait::async_trait;

/// Client for `/registry/{version_key}/{node_ip}:{port}` nodes.
///
/// Operations are at-least-once and idempotent; implementations are
/// expected to mask session re-establishment transparently.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Creates the entry for `instance`, overwriting the payload if the
    /// node already exists. Ensures ancestor paths exist.
    async fn declare(&self, instance: &Instance) -> Result<(), AimError>;

    /// Deletes the entry for `instance`. Missing is success.
    async fn retract(&self, instance: &Instance) -> Result<(), AimError>;

    /// Walks `/registry/*`, returning every instance whose node IP matches
    /// this node.
    async fn list_local(&self) -> Result<HashSet<Instance>, AimError>;

    /// Reconciles the registry with `live_set`: retracts entries not in
    /// `live_set`, declares members of `live_set` not yet registered.
    async fn reconcile(&self, live_set: &HashSet<Instance>) -> Result<(), AimError> {
        let registered = self.list_local().await?;
        for stale in registered.difference(live_set) {
            self.retract(stale).await?;
        }
        for missing in live_set.difference(&registered) {
            self.declare(missing).await?;
        }
        Ok(())
    }

    /// Ensures the version prefix node exists, independent of any instance.
    async fn ensure_version_prefix(&self, version_key: &aim_core::VersionKey) -> Result<(), AimError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
