// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Test builders shared across crates.

use crate::instance::Instance;
use crate::key::{RevisionKey, VersionKey};

/// Builds a `RevisionKey` from short component strings, for test brevity.
pub fn revision_key(project_id: &str, service_id: &str, version_id: &str, revision_id: &str) -> RevisionKey {
    VersionKey::new(project_id, service_id, version_id).with_revision(revision_id)
}

/// Builds an `Instance` from short component strings and a port.
pub fn instance(project_id: &str, service_id: &str, version_id: &str, revision_id: &str, port: u16) -> Instance {
    Instance::new(revision_key(project_id, service_id, version_id, revision_id), port)
}
