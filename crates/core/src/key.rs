// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Version and revision keys.
//!
//! A [`VersionKey`] is the ordered triple `(projectId, serviceId, versionId)`
//! serialized with [`SEPARATOR`]. A [`RevisionKey`] extends it with a
//! revision ID that identifies one immutable source snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AimError;

/// Separator used when serializing a key's components into a single string.
pub const SEPARATOR: char = '_';

/// Uniquely identifies a deployed application version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionKey {
    pub project_id: String,
    pub service_id: String,
    pub version_id: String,
}

impl VersionKey {
    pub fn new(
        project_id: impl Into<String>,
        service_id: impl Into<String>,
        version_id: impl Into<String>,
    ) -> Self {
        Self { project_id: project_id.into(), service_id: service_id.into(), version_id: version_id.into() }
    }

    /// Parses `project_service_version` into its three components.
    pub fn parse(s: &str) -> Result<Self, AimError> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(AimError::BadConfiguration(format!("invalid version key: {s}")));
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    pub fn with_revision(&self, revision_id: impl Into<String>) -> RevisionKey {
        RevisionKey {
            project_id: self.project_id.clone(),
            service_id: self.service_id.clone(),
            version_id: self.version_id.clone(),
            revision_id: revision_id.into(),
        }
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}{SEPARATOR}{}", self.project_id, self.service_id, self.version_id)
    }
}

/// Identifies a specific immutable source snapshot of a [`VersionKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevisionKey {
    pub project_id: String,
    pub service_id: String,
    pub version_id: String,
    pub revision_id: String,
}

impl RevisionKey {
    /// Parses `project_service_version_revision` into its four components.
    pub fn parse(s: &str) -> Result<Self, AimError> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        if parts.len() != 4 || parts.iter().any(|p| p.is_empty()) {
            return Err(AimError::BadConfiguration(format!("invalid revision key: {s}")));
        }
        Ok(Self {
            project_id: parts[0].to_string(),
            service_id: parts[1].to_string(),
            version_id: parts[2].to_string(),
            revision_id: parts[3].to_string(),
        })
    }

    pub fn version_key(&self) -> VersionKey {
        VersionKey::new(&self.project_id, &self.service_id, &self.version_id)
    }
}

impl fmt::Display for RevisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.project_id, self.service_id, self.version_id, self.revision_id
        )
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
