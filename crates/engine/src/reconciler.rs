// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Boot-time reconciliation: brings supervisor state, the OS process
//! table, and the registry back into agreement before the HTTP surface
//! starts serving.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use aim_adapters::{ProcessTable, RegistryClient, SupervisorAdapter, WatchState};
use aim_core::{AimError, Instance, Watch};
use tracing::info;

use crate::api_server_pool::ApiServerPool;

pub struct Reconciler {
    supervisor: Arc<dyn SupervisorAdapter>,
    registry: Arc<dyn RegistryClient>,
    process_table: Arc<dyn ProcessTable>,
    api_servers: Arc<ApiServerPool>,
}

impl Reconciler {
    pub fn new(
        supervisor: Arc<dyn SupervisorAdapter>,
        registry: Arc<dyn RegistryClient>,
        process_table: Arc<dyn ProcessTable>,
        api_servers: Arc<ApiServerPool>,
    ) -> Self {
        Self { supervisor, registry, process_table, api_servers }
    }

    /// Runs the full six-step reconciliation and returns the resulting
    /// `runningInstances` set.
    pub async fn run(&self) -> Result<HashSet<Instance>, AimError> {
        let entries = self.supervisor.entries().await?;

        let (instance_entries, api_server_entries): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|(watch, _)| watch.kind() == aim_core::WatchKind::Instance);

        let mut removed_any = false;
        let mut monitored: HashMap<(String, u16), Instance> = HashMap::new();
        for (watch, state) in &instance_entries {
            let Watch::Instance { revision_key, port } = watch else { continue };
            if *state == WatchState::Unmonitored {
                self.supervisor.remove_config(watch).await?;
                removed_any = true;
                continue;
            }
            monitored.insert((revision_key.to_string(), *port), Instance::new(revision_key.clone(), *port));
        }
        if removed_any {
            self.supervisor.reload().await?;
        }

        let monitored_keys: HashSet<(String, u16)> = monitored.keys().cloned().collect();
        let killed = self.process_table.kill_unmonitored(&monitored_keys).await?;
        if killed > 0 {
            info!(killed, "reconciler killed unmonitored instance processes");
        }

        self.api_servers.discover(api_server_entries.into_iter().map(|(watch, _)| watch));
        let distinct_projects: HashSet<String> =
            monitored.values().map(|instance| instance.revision_key.project_id.clone()).collect();
        for version_key in monitored.values().map(|instance| instance.version_key()).collect::<HashSet<_>>() {
            self.registry.ensure_version_prefix(&version_key).await?;
        }
        for project_id in &distinct_projects {
            self.api_servers.ensure(project_id).await?;
        }

        let running_instances: HashSet<Instance> = monitored.into_values().collect();
        self.registry.reconcile(&running_instances).await?;

        Ok(running_instances)
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
