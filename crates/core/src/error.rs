// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Error kinds surfaced by the lifecycle engine and its collaborators.

use thiserror::Error;

/// Errors the lifecycle engine can raise. See the error handling design for
/// which of these are recoverable locally and which propagate to a caller.
#[derive(Debug, Error)]
pub enum AimError {
    /// Validation failure: malformed key, missing field, unknown runtime,
    /// insufficient Java heap. Surfaces as HTTP 400.
    #[error("bad configuration: {0}")]
    BadConfiguration(String),

    /// `stop_one` could not find a matching supervisor entry. Surfaces as
    /// HTTP 500 — upstream treats a missing entry on stop as an internal
    /// inconsistency, not a client error.
    #[error("not found: {0}")]
    NotFound(String),

    /// The supervisor returned 503 for more retries than allowed.
    #[error("supervisor transient failure: {0}")]
    SupervisorTransient(String),

    /// The supervisor returned 404 on unmonitor: treated as already-stopped
    /// by callers, never surfaced past the adapter boundary.
    #[error("supervisor does not know about: {0}")]
    SupervisorAbsent(String),

    /// Starting a watch failed outright; fatal to the calling request.
    #[error("supervisor start failed: {0}")]
    SupervisorStartFailed(String),

    /// Fetching or extracting source for a revision failed.
    #[error("source store error: {0}")]
    SourceStore(String),

    /// Catch-all for conditions that don't fit another kind but must not
    /// crash the process.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AimError {
    /// HTTP status this error should be reported as, per the error design.
    pub fn status_code(&self) -> u16 {
        match self {
            AimError::BadConfiguration(_) => 400,
            AimError::NotFound(_) => 500,
            AimError::SupervisorTransient(_) => 500,
            AimError::SupervisorAbsent(_) => 500,
            AimError::SupervisorStartFailed(_) => 500,
            AimError::SourceStore(_) => 500,
            AimError::Internal(_) => 500,
        }
    }
}
