// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! The supervisor's name for a managed process.
//!
//! Two families exist: instance watches (`instance_{revision_key}-{port}`)
//! and api-server watches (`apisrv_{project_id}-{port}`). The watch name is
//! the canonical identifier and is parsed back with a structured parser
//! rather than a regular expression.

use std::fmt;

use crate::error::AimError;
use crate::key::RevisionKey;

pub const INSTANCE_PREFIX: &str = "instance_";
pub const API_SERVER_PREFIX: &str = "apisrv_";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Watch {
    Instance { revision_key: RevisionKey, port: u16 },
    ApiServer { project_id: String, port: u16 },
}

/// Which family a watch belongs to, without requiring a parsed body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchKind {
    Instance,
    ApiServer,
}

impl Watch {
    pub fn instance(revision_key: RevisionKey, port: u16) -> Self {
        Watch::Instance { revision_key, port }
    }

    pub fn api_server(project_id: impl Into<String>, port: u16) -> Self {
        Watch::ApiServer { project_id: project_id.into(), port }
    }

    pub fn kind(&self) -> WatchKind {
        match self {
            Watch::Instance { .. } => WatchKind::Instance,
            Watch::ApiServer { .. } => WatchKind::ApiServer,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            Watch::Instance { port, .. } => *port,
            Watch::ApiServer { port, .. } => *port,
        }
    }

    /// Parses a canonical watch name back into its structured form.
    ///
    /// Grammar: `{prefix}{body}-{port}` where `body` never itself contains
    /// the trailing `-{port}` suffix, so splitting at the *last* `-` always
    /// isolates the port.
    pub fn parse(name: &str) -> Result<Self, AimError> {
        if let Some(rest) = name.strip_prefix(INSTANCE_PREFIX) {
            let (revision_str, port_str) = split_trailing_port(name, rest)?;
            let revision_key = RevisionKey::parse(revision_str)?;
            let port = parse_port(name, port_str)?;
            return Ok(Watch::Instance { revision_key, port });
        }
        if let Some(rest) = name.strip_prefix(API_SERVER_PREFIX) {
            let (project_id, port_str) = split_trailing_port(name, rest)?;
            let port = parse_port(name, port_str)?;
            return Ok(Watch::ApiServer { project_id: project_id.to_string(), port });
        }
        Err(AimError::Internal(format!("watch name matches no known family: {name}")))
    }
}

fn split_trailing_port<'a>(full_name: &str, rest: &'a str) -> Result<(&'a str, &'a str), AimError> {
    rest.rsplit_once('-')
        .filter(|(body, _)| !body.is_empty())
        .ok_or_else(|| AimError::Internal(format!("watch name missing port suffix: {full_name}")))
}

fn parse_port(full_name: &str, port_str: &str) -> Result<u16, AimError> {
    port_str
        .parse()
        .map_err(|_| AimError::Internal(format!("watch name has non-numeric port: {full_name}")))
}

impl fmt::Display for Watch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Watch::Instance { revision_key, port } => {
                write!(f, "{INSTANCE_PREFIX}{revision_key}-{port}")
            }
            Watch::ApiServer { project_id, port } => {
                write!(f, "{API_SERVER_PREFIX}{project_id}-{port}")
            }
        }
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
