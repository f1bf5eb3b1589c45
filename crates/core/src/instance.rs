// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! The node-local unit of supervision and its registry projection.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::key::{RevisionKey, VersionKey};

/// Lowest port AIM will ever assign to an application-server instance.
pub const MIN_INSTANCE_PORT: u16 = 1024;

/// A running application-server child process serving one revision on one
/// port on this node. Equality and hashing are by `(revision_key, port)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub revision_key: RevisionKey,
    pub port: u16,
}

impl Instance {
    pub fn new(revision_key: RevisionKey, port: u16) -> Self {
        Self { revision_key, port }
    }

    pub fn version_key(&self) -> VersionKey {
        self.revision_key.version_key()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.revision_key == other.revision_key && self.port == other.port
    }
}

impl Eq for Instance {}

impl std::hash::Hash for Instance {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.revision_key.hash(state);
        self.port.hash(state);
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.revision_key, self.port)
    }
}

/// The registry projection of an [`Instance`]: a node under
/// `/registry/{version_key}/{node_ip}:{port}` whose payload is the
/// revision ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceEntry {
    pub version_key: VersionKey,
    pub node_ip: String,
    pub port: u16,
    pub revision_id: String,
}

impl InstanceEntry {
    pub fn for_instance(instance: &Instance, node_ip: impl Into<String>) -> Self {
        Self {
            version_key: instance.version_key(),
            node_ip: node_ip.into(),
            port: instance.port,
            revision_id: instance.revision_key.revision_id.clone(),
        }
    }

    /// Path under the registry root this entry is stored at.
    pub fn path(&self) -> String {
        format!("/registry/{}/{}:{}", self.version_key, self.node_ip, self.port)
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
