// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! The state machine owning the correspondence between desired instances,
//! supervised child processes, registry entries, and health signals.
//!
//! `start`, `stop_one`, and `stop_all` are the only entry points; nothing
//! else mutates `running_instances` or the registry.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use aim_adapters::{ProjectsModel, RegistryClient, SourceStore, SupervisorAdapter, WatchConfig};
use aim_core::{AimError, Instance, RevisionKey, Runtime, VersionKey, Watch};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::api_server_pool::ApiServerPool;
use crate::instance_class;
use crate::log_rotate::{LogRotateWriter, DASHBOARD_PROJECT_ID};
use crate::runtime_command::{self, CommandParams};
use crate::web_inf;
use crate::{health_probe, termination};

/// Process-wide, read-once-at-boot cluster configuration the engine needs
/// to build runtime command lines, independent of any one request.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    pub private_ip: String,
    pub db_proxy: String,
    pub tq_proxy: String,
    pub syslog_server: Option<String>,
}

pub struct LifecycleEngine {
    registry: Arc<dyn RegistryClient>,
    supervisor: Arc<dyn SupervisorAdapter>,
    source_store: Arc<dyn SourceStore>,
    projects: Arc<dyn ProjectsModel>,
    api_servers: Arc<ApiServerPool>,
    log_rotate: Arc<LogRotateWriter>,
    health_client: reqwest::Client,
    cluster: ClusterConfig,
    pidfile_dir: PathBuf,
    running_instances: Mutex<HashSet<Instance>>,
}

impl LifecycleEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<dyn RegistryClient>,
        supervisor: Arc<dyn SupervisorAdapter>,
        source_store: Arc<dyn SourceStore>,
        projects: Arc<dyn ProjectsModel>,
        api_servers: Arc<ApiServerPool>,
        log_rotate: Arc<LogRotateWriter>,
        cluster: ClusterConfig,
        pidfile_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            supervisor,
            source_store,
            projects,
            api_servers,
            log_rotate,
            health_client: health_probe::client(),
            cluster,
            pidfile_dir: pidfile_dir.into(),
            running_instances: Mutex::new(HashSet::new()),
        }
    }

    /// Seeds `running_instances` at boot, from the reconciler's result.
    pub fn seed_running_instances(&self, instances: HashSet<Instance>) {
        *self.running_instances.lock() = instances;
    }

    pub fn running_instances(&self) -> HashSet<Instance> {
        self.running_instances.lock().clone()
    }

    pub fn running_versions_and_ports(&self) -> HashSet<(VersionKey, u16)> {
        self.running_instances.lock().iter().map(|instance| (instance.version_key(), instance.port)).collect()
    }

    fn pidfile_for(&self, revision_key: &RevisionKey, port: u16) -> PathBuf {
        self.pidfile_dir.join(format!("app___{revision_key}-{port}.pid"))
    }

    /// `POST /versions/{versionKey}`. Returns once the watch has been
    /// started; the health probe and registry declaration continue in a
    /// background task after this returns.
    pub async fn start(self: &Arc<Self>, version_key: &VersionKey, app_port: u16, login_server: String) -> Result<(), AimError> {
        if !aim_core::validation::is_valid_project_id(&version_key.project_id) {
            return Err(AimError::BadConfiguration(format!("invalid project ID: {}", version_key.project_id)));
        }

        let record = self.projects.version_record(version_key).await?;
        let revision_key = version_key.with_revision(record.revision_id.clone());

        let api_port = self.api_servers.ensure(&version_key.project_id).await?;
        self.source_store.ensure(&revision_key, &record.source_url, record.runtime).await?;

        let app_dir = self.source_store.app_directory(&revision_key);
        let gopath_dir = matches!(record.runtime, Runtime::Go).then(|| self.source_store.gopath_directory(&revision_key));
        let web_inf_dir = if matches!(record.runtime, Runtime::Java) { web_inf::find(&app_dir).await } else { None };

        let max_memory_mb = instance_class::max_memory_mb(record.instance_class.as_deref());
        let pidfile = self.pidfile_for(&revision_key, app_port);
        let env_variables: BTreeMap<String, String> = record.env_variables.clone();
        let trusted = version_key.project_id == DASHBOARD_PROJECT_ID;

        let params = CommandParams {
            project_id: &version_key.project_id,
            revision_key: &revision_key,
            port: app_port,
            api_server_port: api_port,
            login_server: &login_server,
            private_ip: &self.cluster.private_ip,
            db_proxy: &self.cluster.db_proxy,
            tq_proxy: &self.cluster.tq_proxy,
            pidfile: &pidfile,
            app_dir: &app_dir,
            gopath_dir: gopath_dir.as_deref(),
            web_inf_dir: web_inf_dir.as_deref(),
            max_memory_mb,
            env_variables: &env_variables,
            trusted,
        };
        let built = runtime_command::build(record.runtime, &params)?;

        let watch = Watch::instance(revision_key.clone(), app_port);
        let config = WatchConfig {
            watch: watch.clone(),
            start_cmd: built.start_cmd,
            pidfile: pidfile.clone(),
            port: app_port,
            env: built.env,
            max_memory_mb,
            syslog_server: self.cluster.syslog_server.clone(),
            kill_exceeded_memory: true,
            check_port: true,
        };
        self.supervisor.write_config(config).await?;
        self.supervisor.start(&watch).await?;

        self.registry.ensure_version_prefix(version_key).await?;

        if let Err(err) = self.log_rotate.install(&version_key.project_id).await {
            warn!(%err, project_id = %version_key.project_id, "failed to install logrotate script");
        }

        let engine = Arc::clone(self);
        let instance = Instance::new(revision_key, app_port);
        let node_ip = self.cluster.private_ip.clone();
        tokio::spawn(async move {
            let ready = health_probe::wait_ready(&engine.health_client, &node_ip, app_port).await;
            if !ready {
                warn!(port = app_port, "health probe deadline expired, relying on failure detector");
                return;
            }
            if let Err(err) = engine.registry.declare(&instance).await {
                warn!(%err, "failed to declare instance in registry after probe success");
                return;
            }
            engine.running_instances.lock().insert(instance);
        });

        Ok(())
    }

    /// `DELETE /versions/{versionKey}/{port}`, driven by the HTTP surface.
    /// A missing supervisor entry surfaces as `NotFound` (HTTP 500).
    pub async fn stop_one(&self, version_key: &VersionKey, port: u16) -> Result<(), AimError> {
        self.stop_one_inner(version_key, port, false).await
    }

    /// `stop_one`, driven by the failure detector. A missing supervisor
    /// entry is logged and swallowed rather than raised, since the
    /// detector can race with a concurrent HTTP-driven stop.
    pub async fn stop_one_from_detector(&self, version_key: &VersionKey, port: u16) -> Result<(), AimError> {
        match self.stop_one_inner(version_key, port, true).await {
            Err(AimError::NotFound(msg)) => {
                warn!(%msg, "stop_one found no matching entry, already stopped by a racing caller");
                Ok(())
            }
            other => other,
        }
    }

    async fn stop_one_inner(&self, version_key: &VersionKey, port: u16, _from_detector: bool) -> Result<(), AimError> {
        if !aim_core::validation::is_valid_project_id(&version_key.project_id) {
            return Err(AimError::BadConfiguration(format!("invalid project ID: {}", version_key.project_id)));
        }

        let entries = self.supervisor.entries().await?;
        let watch = entries
            .keys()
            .find(|watch| matches!(watch, Watch::Instance { revision_key, port: p } if &revision_key.version_key() == version_key && *p == port))
            .cloned()
            .ok_or_else(|| AimError::NotFound(format!("no instance watch for {version_key} port {port}")))?;

        let Watch::Instance { revision_key, .. } = watch.clone() else { unreachable!() };
        let instance = Instance::new(revision_key.clone(), port);

        self.registry.retract(&instance).await?;
        self.running_instances.lock().remove(&instance);

        aim_adapters::teardown(self.supervisor.as_ref(), &watch).await?;
        let pidfile = self.pidfile_for(&revision_key, port);
        tokio::spawn(termination::terminate_after_grace(pidfile));

        self.finish_stop(version_key).await
    }

    /// `DELETE /versions/{versionKey}`. Stops every instance of `version_key`
    /// on this node; never fails because no instances are running.
    pub async fn stop_all(&self, version_key: &VersionKey) -> Result<(), AimError> {
        if !aim_core::validation::is_valid_project_id(&version_key.project_id) {
            return Err(AimError::BadConfiguration(format!("invalid project ID: {}", version_key.project_id)));
        }

        let entries = self.supervisor.entries().await?;
        let matching: Vec<(RevisionKey, u16)> = entries
            .keys()
            .filter_map(|watch| match watch {
                Watch::Instance { revision_key, port } if &revision_key.version_key() == version_key => {
                    Some((revision_key.clone(), *port))
                }
                _ => None,
            })
            .collect();

        for (revision_key, port) in matching {
            let watch = Watch::instance(revision_key.clone(), port);
            let instance = Instance::new(revision_key.clone(), port);
            self.registry.retract(&instance).await?;
            self.running_instances.lock().remove(&instance);
            aim_adapters::teardown(self.supervisor.as_ref(), &watch).await?;
            let pidfile = self.pidfile_for(&revision_key, port);
            tokio::spawn(termination::terminate_after_grace(pidfile));
        }

        if self.projects.version_record(version_key).await.is_err() {
            if let Err(err) = self.log_rotate.remove(&version_key.project_id).await {
                warn!(%err, project_id = %version_key.project_id, "failed to remove logrotate script");
            }
        }

        self.finish_stop(version_key).await
    }

    /// Shared tail of `stop_one`/`stop_all`: stop the project's api-server
    /// if it has no remaining instances, reload the supervisor, and clean
    /// up source for revisions no longer referenced anywhere.
    async fn finish_stop(&self, version_key: &VersionKey) -> Result<(), AimError> {
        let entries = self.supervisor.entries().await?;
        let remaining_for_project: Vec<RevisionKey> = entries
            .keys()
            .filter_map(|watch| match watch {
                Watch::Instance { revision_key, .. } if revision_key.project_id == version_key.project_id => {
                    Some(revision_key.clone())
                }
                _ => None,
            })
            .collect();

        if remaining_for_project.is_empty() {
            self.api_servers.stop(&version_key.project_id).await?;
        }

        self.supervisor.reload().await?;

        let mut active_revisions: HashSet<String> =
            entries.keys().filter_map(|watch| match watch {
                Watch::Instance { revision_key, .. } => Some(revision_key.to_string()),
                _ => None,
            }).collect();
        if let Ok(record) = self.projects.version_record(version_key).await {
            active_revisions.insert(version_key.with_revision(record.revision_id).to_string());
        }
        self.source_store.clean_old_revisions(&active_revisions).await?;

        info!(version_key = %version_key, "stop completed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
