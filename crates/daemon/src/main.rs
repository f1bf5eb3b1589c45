// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! `aimd`: boots the lifecycle engine, reconciles local state once against
//! the supervisor and the OS process table, then serves the control API.

use std::sync::Arc;

use aim_adapters::load_balancer::HttpLoadBalancerStatsClient;
use aim_adapters::process_table::SysinfoProcessTable;
use aim_adapters::projects::HttpProjectsModel;
use aim_adapters::registry::HttpRegistryClient;
use aim_adapters::RegistryClient;
use aim_adapters::source::FsSourceStore;
use aim_adapters::supervisor::HttpSupervisorAdapter;
use aim_daemon::{http, Config};
use aim_engine::{ApiServerPool, ClusterConfig, FailureDetector, LifecycleEngine, LogRotateWriter, Reconciler};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// The sidecar process API-server instances proxy Google-App-Engine-style
/// API calls to.
const API_SERVER_BIN: &str = "/opt/appscale_api_server/bin/appscale-api-server";

/// Per-project api-server instances are given a flat default ceiling; they
/// don't carry the revision-specific instance class an application does.
const API_SERVER_MAX_MEMORY_MB: u32 = 200;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "invalid configuration");
            std::process::exit(1);
        }
    };
    if let Err(err) = run(config).await {
        tracing::error!(%err, "aimd exited with an error");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), aim_core::AimError> {
    info!(http_port = config.http_port, node = %config.private_ip, "starting aimd");

    let supervisor = Arc::new(HttpSupervisorAdapter::new(config.supervisor_base_url.clone(), config.supervisor_config_dir.clone()));
    let registry = Arc::new(HttpRegistryClient::new(config.registry_base_url.clone(), config.private_ip.clone()));
    let source_store = Arc::new(FsSourceStore::new(config.unpack_root.clone()));
    let projects = Arc::new(HttpProjectsModel::new(config.projects_base_url.clone()));
    let load_balancer = Arc::new(HttpLoadBalancerStatsClient::new(config.load_balancer_ips.clone(), config.secret.clone()));
    let process_table = Arc::new(SysinfoProcessTable::new());

    let api_servers = Arc::new(ApiServerPool::new(
        supervisor.clone(),
        |project_id, port| format!("{API_SERVER_BIN} --port {port} --project-id {project_id}"),
        config.pidfile_dir.clone(),
        API_SERVER_MAX_MEMORY_MB,
    ));
    let log_rotate = Arc::new(LogRotateWriter::new(config.logrotate_config_dir.clone()));
    let cluster = ClusterConfig {
        private_ip: config.private_ip.clone(),
        db_proxy: config.db_proxy.clone(),
        tq_proxy: config.tq_proxy.clone(),
        syslog_server: None,
    };

    let engine = Arc::new(LifecycleEngine::new(
        registry.clone(),
        supervisor.clone(),
        source_store,
        projects,
        api_servers.clone(),
        log_rotate,
        cluster,
        config.pidfile_dir.clone(),
    ));

    let reconciler = Reconciler::new(supervisor, registry.clone(), process_table, api_servers);
    let running = reconciler.run().await?;
    info!(running_instances = running.len(), "boot-time reconciliation complete");
    engine.seed_running_instances(running);
    registry.reconcile(&engine.running_instances()).await?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let failure_detector = Arc::new(FailureDetector::new(load_balancer, engine.clone(), config.private_ip.clone()));
    let detector_task = tokio::spawn(failure_detector.run(shutdown_rx));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port))
        .await
        .map_err(|err| aim_core::AimError::Internal(format!("binding {}: {err}", config.http_port)))?;
    let local_addr = listener.local_addr().map_err(|err| aim_core::AimError::Internal(err.to_string()))?;
    info!(addr = %local_addr, "listening");
    let app = http::router(engine);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| aim_core::AimError::Internal(format!("http server: {err}")))?;

    let _ = shutdown_tx.send(true);
    let _ = detector_task.await;
    info!("aimd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
