// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use std::sync::Arc;

use aim_adapters::{FakeProjectsModel, FakeRegistryClient, FakeSourceStore, FakeSupervisorAdapter, VersionRecord, WatchState};
use aim_core::{Runtime, VersionKey, Watch};

use super::*;

struct Fixture {
    engine: Arc<LifecycleEngine>,
    supervisor: Arc<FakeSupervisorAdapter>,
    registry: Arc<FakeRegistryClient>,
    projects: Arc<FakeProjectsModel>,
    source_store: Arc<FakeSourceStore>,
    _log_dir: tempfile::TempDir,
}

fn fixture() -> Fixture {
    let supervisor = Arc::new(FakeSupervisorAdapter::new());
    let registry = Arc::new(FakeRegistryClient::new("10.0.0.1"));
    let projects = Arc::new(FakeProjectsModel::new());
    let source_store = Arc::new(FakeSourceStore::new());
    let api_servers = Arc::new(ApiServerPool::new(
        supervisor.clone(),
        |project_id, port| format!("/bin/apisrv --project {project_id} --port {port}"),
        "/var/run/aim",
        256,
    ));
    let log_dir = tempfile::tempdir().unwrap();
    let log_rotate = Arc::new(LogRotateWriter::new(log_dir.path()));
    let cluster = ClusterConfig {
        private_ip: "10.0.0.1".to_string(),
        db_proxy: "10.0.0.2".to_string(),
        tq_proxy: "10.0.0.3".to_string(),
        syslog_server: None,
    };
    let engine = Arc::new(LifecycleEngine::new(
        registry.clone(),
        supervisor.clone(),
        source_store.clone(),
        projects.clone(),
        api_servers,
        log_rotate,
        cluster,
        "/var/run/aim",
    ));
    Fixture { engine, supervisor, registry, projects, source_store, _log_dir: log_dir }
}

fn seed_version(projects: &FakeProjectsModel, version_key: &VersionKey) {
    projects.seed(
        version_key.clone(),
        VersionRecord {
            runtime: Runtime::Python27,
            env_variables: Default::default(),
            revision_id: "1".to_string(),
            source_url: "http://example.invalid/app.zip".to_string(),
            instance_class: None,
        },
    );
}

#[tokio::test]
async fn start_writes_config_and_ensures_registry_prefix() {
    let fx = fixture();
    let version_key = VersionKey::new("proj", "default", "v1");
    seed_version(&fx.projects, &version_key);

    fx.engine.start(&version_key, 1000, "login.example.invalid".to_string()).await.unwrap();

    let revision_key = version_key.with_revision("1");
    let watch = Watch::instance(revision_key.clone(), 1000);
    let entries = fx.supervisor.calls();
    assert!(entries.iter().any(|c| matches!(c, aim_adapters::supervisor::SupervisorCall::Start(w) if w == &watch)));
    assert!(fx.source_store.is_ensured(&revision_key));
}

#[tokio::test]
async fn start_rejects_invalid_project_id() {
    let fx = fixture();
    let version_key = VersionKey::new("BadProject", "default", "v1");

    let err = fx.engine.start(&version_key, 1000, "login".to_string()).await.unwrap_err();
    assert!(matches!(err, aim_core::AimError::BadConfiguration(_)));
}

#[tokio::test]
async fn stop_one_retracts_and_tears_down_matching_watch() {
    let fx = fixture();
    let version_key = VersionKey::new("proj", "default", "v1");
    let revision_key = version_key.with_revision("1");
    let watch = Watch::instance(revision_key.clone(), 1000);
    fx.supervisor.seed(watch.clone(), WatchState::Running);
    let instance = aim_core::Instance::new(revision_key, 1000);
    fx.registry.declare(&instance).await.unwrap();

    fx.engine.stop_one(&version_key, 1000).await.unwrap();

    assert!(!fx.registry.contains(&instance));
    assert_eq!(
        fx.supervisor.call_count(&watch, |c| matches!(c, aim_adapters::supervisor::SupervisorCall::RemoveConfig(_))),
        1
    );
}

#[tokio::test]
async fn stop_one_on_http_path_surfaces_not_found() {
    let fx = fixture();
    let version_key = VersionKey::new("proj", "default", "v1");

    let err = fx.engine.stop_one(&version_key, 1000).await.unwrap_err();
    assert!(matches!(err, aim_core::AimError::NotFound(_)));
}

#[tokio::test]
async fn stop_one_from_detector_swallows_not_found() {
    let fx = fixture();
    let version_key = VersionKey::new("proj", "default", "v1");

    fx.engine.stop_one_from_detector(&version_key, 1000).await.unwrap();
}

#[tokio::test]
async fn stop_all_removes_every_port_for_a_version() {
    let fx = fixture();
    let version_key = VersionKey::new("proj", "default", "v1");
    let revision_key = version_key.with_revision("1");
    let watch_a = Watch::instance(revision_key.clone(), 1000);
    let watch_b = Watch::instance(revision_key.clone(), 1001);
    fx.supervisor.seed(watch_a.clone(), WatchState::Running);
    fx.supervisor.seed(watch_b.clone(), WatchState::Running);

    fx.engine.stop_all(&version_key).await.unwrap();

    let entries = fx.supervisor.entries().await.unwrap();
    assert!(entries.is_empty());
}
