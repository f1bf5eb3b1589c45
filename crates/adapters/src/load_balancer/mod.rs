// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Queries the load balancer's stats feed for instances it has marked down,
//! so the failure detector can stop and restart them.

#[cfg(any(test, feature = "test-support"))]
mod fake;
mod http;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLoadBalancerStatsClient;
pub use http::HttpLoadBalancerStatsClient;

use std::collections::HashSet;

use aim_core::{AimError, VersionKey};
use async_trait::async_trait;

/// A single instance the load balancer currently routes as down.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DownInstance {
    pub version_key: VersionKey,
    pub port: u16,
}

/// Reports instances the load balancer considers unreachable on this node.
#[async_trait]
pub trait LoadBalancerStatsClient: Send + Sync {
    /// Returns every instance on `node_ip` whose proxy member status starts
    /// with `DOWN`, across all `gae_`-prefixed proxies.
    async fn fetch_down_instances(&self, node_ip: &str) -> Result<HashSet<DownInstance>, AimError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
