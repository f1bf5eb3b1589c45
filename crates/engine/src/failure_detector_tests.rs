// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use std::sync::Arc;

use aim_adapters::{DownInstance, FakeLoadBalancerStatsClient, FakeProjectsModel, FakeRegistryClient, FakeSourceStore, FakeSupervisorAdapter, WatchState};
use aim_core::{Instance, VersionKey, Watch};

use super::*;

fn engine_with_running_instance(version_key: &VersionKey, port: u16) -> (Arc<LifecycleEngine>, Arc<FakeSupervisorAdapter>) {
    let supervisor = Arc::new(FakeSupervisorAdapter::new());
    let registry = Arc::new(FakeRegistryClient::new("10.0.0.1"));
    let projects = Arc::new(FakeProjectsModel::new());
    let source_store = Arc::new(FakeSourceStore::new());
    let api_servers = Arc::new(crate::ApiServerPool::new(
        supervisor.clone(),
        |project_id, port| format!("/bin/apisrv --project {project_id} --port {port}"),
        "/var/run/aim",
        256,
    ));
    let log_dir = tempfile::tempdir().unwrap();
    let log_rotate = Arc::new(crate::LogRotateWriter::new(log_dir.path()));
    let cluster = crate::ClusterConfig {
        private_ip: "10.0.0.1".to_string(),
        db_proxy: "10.0.0.2".to_string(),
        tq_proxy: "10.0.0.3".to_string(),
        syslog_server: None,
    };
    let engine = Arc::new(LifecycleEngine::new(
        registry,
        supervisor.clone(),
        source_store,
        projects,
        api_servers,
        log_rotate,
        cluster,
        "/var/run/aim",
    ));

    let revision_key = version_key.with_revision("1");
    let watch = Watch::instance(revision_key.clone(), port);
    supervisor.seed(watch, WatchState::Running);
    engine.seed_running_instances(std::iter::once(Instance::new(revision_key, port)).collect());

    (engine, supervisor)
}

#[tokio::test]
async fn tick_stops_only_instances_the_load_balancer_marks_down() {
    let version_key = VersionKey::new("proj", "default", "v1");
    let (engine, supervisor) = engine_with_running_instance(&version_key, 8080);
    let load_balancer = Arc::new(FakeLoadBalancerStatsClient::new());
    load_balancer.mark_down(DownInstance { version_key: version_key.clone(), port: 8080 });

    let revision_key = version_key.with_revision("1");
    let watch = Watch::instance(revision_key, 8080);
    let detector = FailureDetector::new(load_balancer, engine.clone(), "10.0.0.1");
    detector.tick().await;

    assert_eq!(
        supervisor.call_count(&watch, |c| matches!(c, aim_adapters::supervisor::SupervisorCall::Unmonitor(_))),
        1
    );
    assert!(!engine.running_instances().iter().any(|i| i.port == 8080));
}

#[tokio::test]
async fn two_ticks_with_the_same_down_set_stop_exactly_once() {
    let version_key = VersionKey::new("proj", "default", "v1");
    let (engine, supervisor) = engine_with_running_instance(&version_key, 8080);
    let load_balancer = Arc::new(FakeLoadBalancerStatsClient::new());
    load_balancer.mark_down(DownInstance { version_key: version_key.clone(), port: 8080 });

    let revision_key = version_key.with_revision("1");
    let watch = Watch::instance(revision_key, 8080);
    let detector = FailureDetector::new(load_balancer, engine.clone(), "10.0.0.1");
    detector.tick().await;
    detector.tick().await;

    assert_eq!(
        supervisor.call_count(&watch, |c| matches!(c, aim_adapters::supervisor::SupervisorCall::Unmonitor(_))),
        1
    );
}
