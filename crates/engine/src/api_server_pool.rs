// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Per-project singleton lifecycle for the sidecar API server.
//!
//! Ports are drawn downward from [`MAX_PORT`], one per project, so the
//! pool never collides with the conventional instance port range above it.

use std::collections::HashMap;
use std::path::PathBuf;

use aim_core::{AimError, Watch};
use aim_adapters::{SupervisorAdapter, WatchConfig};
use parking_lot::Mutex;

/// Ceiling api-server ports are drawn downward from; stays above the
/// conventional instance port range so the two families never collide.
pub const MAX_PORT: u16 = 19999;

enum PortClaim {
    Existing(u16),
    New(u16),
}

pub struct ApiServerPool {
    supervisor: std::sync::Arc<dyn SupervisorAdapter>,
    start_cmd: Box<dyn Fn(&str, u16) -> String + Send + Sync>,
    pidfile_dir: PathBuf,
    max_memory_mb: u32,
    assigned: Mutex<HashMap<String, u16>>,
}

impl ApiServerPool {
    pub fn new(
        supervisor: std::sync::Arc<dyn SupervisorAdapter>,
        start_cmd: impl Fn(&str, u16) -> String + Send + Sync + 'static,
        pidfile_dir: impl Into<PathBuf>,
        max_memory_mb: u32,
    ) -> Self {
        Self {
            supervisor,
            start_cmd: Box::new(start_cmd),
            pidfile_dir: pidfile_dir.into(),
            max_memory_mb,
            assigned: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the existing port for `project_id` if present, else assigns
    /// and starts a new api-server watch and caches the port.
    ///
    /// The port is claimed under the same lock hold that checks for an
    /// existing assignment, so two concurrent `ensure` calls for different
    /// projects can never be handed the same port: the second caller's scan
    /// for a free port always sees the first caller's claim, even though the
    /// first caller's `write_config`/`start` is still in flight.
    pub async fn ensure(&self, project_id: &str) -> Result<u16, AimError> {
        let port = match self.claim_port(project_id) {
            PortClaim::Existing(port) => return Ok(port),
            PortClaim::New(port) => port,
        };

        let watch = Watch::api_server(project_id, port);
        let pidfile = self.pidfile_dir.join(format!("apisrv-{project_id}-{port}.pid"));
        let config = WatchConfig::for_api_server(
            watch.clone(),
            (self.start_cmd)(project_id, port),
            pidfile,
            port,
            self.max_memory_mb,
        );

        if let Err(err) = self.supervisor.write_config(config).await {
            self.assigned.lock().remove(project_id);
            return Err(err);
        }
        if let Err(err) = self.supervisor.start(&watch).await {
            self.assigned.lock().remove(project_id);
            return Err(err);
        }

        Ok(port)
    }

    /// Returns `project_id`'s existing port, or claims the next free one for
    /// it under the same lock hold used to pick it.
    fn claim_port(&self, project_id: &str) -> PortClaim {
        let mut assigned = self.assigned.lock();
        if let Some(port) = assigned.get(project_id).copied() {
            return PortClaim::Existing(port);
        }
        let floor = assigned.values().copied().min().unwrap_or(MAX_PORT + 1);
        let port = floor.saturating_sub(1).min(MAX_PORT);
        assigned.insert(project_id.to_string(), port);
        PortClaim::New(port)
    }

    /// Tears down the watch for `project_id`, if one is assigned, and
    /// forgets the mapping.
    pub async fn stop(&self, project_id: &str) -> Result<(), AimError> {
        let port = self.assigned.lock().remove(project_id);
        let Some(port) = port else { return Ok(()) };

        let watch = Watch::api_server(project_id, port);
        aim_adapters::teardown(self.supervisor.as_ref(), &watch).await
    }

    /// Repopulates the mapping from the supervisor's own api-server
    /// entries, for use at reconciler boot.
    pub fn discover(&self, entries: impl IntoIterator<Item = Watch>) {
        let mut assigned = self.assigned.lock();
        for watch in entries {
            if let Watch::ApiServer { project_id, port } = watch {
                assigned.insert(project_id, port);
            }
        }
    }

    pub fn port_for(&self, project_id: &str) -> Option<u16> {
        self.assigned.lock().get(project_id).copied()
    }
}

#[cfg(test)]
#[path = "api_server_pool_tests.rs"]
mod tests;
