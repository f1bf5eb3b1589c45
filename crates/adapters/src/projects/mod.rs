// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Reads version configuration from the cluster scheduler's projects model.
//!
//! This is the one collaborator the lifecycle engine only ever reads from:
//! deployment metadata (runtime, environment variables, instance class,
//! source archive URL, current revision) is owned and mutated entirely by
//! the scheduler, never by this node.

#[cfg(any(test, feature = "test-support"))]
mod fake;
mod http;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProjectsModel;
pub use http::HttpProjectsModel;

use aim_core::{AimError, Runtime, VersionKey};
use async_trait::async_trait;
use serde::Deserialize;

/// The subset of a version's deployment configuration the engine needs to
/// start or reconcile its instances.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionRecord {
    pub runtime: Runtime,
    #[serde(default)]
    pub env_variables: std::collections::BTreeMap<String, String>,
    pub revision_id: String,
    pub source_url: String,
    /// Scheduler-assigned instance class, e.g. `F4`; `None` uses the
    /// runtime's default heap/memory ceiling.
    #[serde(default)]
    pub instance_class: Option<String>,
}

/// Reads per-version deployment configuration from the scheduler.
#[async_trait]
pub trait ProjectsModel: Send + Sync {
    async fn version_record(&self, version_key: &VersionKey) -> Result<VersionRecord, AimError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
