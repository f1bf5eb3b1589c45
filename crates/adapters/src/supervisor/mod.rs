// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Facade over the out-of-process supervisor that controls start/stop,
//! pidfile tracking, memory caps, and port health checks for watches.

mod http;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use http::HttpSupervisorAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSupervisorAdapter, SupervisorCall};

use std::collections::HashMap;
use std::path::PathBuf;

use aim_core::{AimError, Watch};
use async_trait::async_trait;

/// A configuration describing one managed process, as materialized to the
/// supervisor's config directory.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchConfig {
    pub watch: Watch,
    pub start_cmd: String,
    pub pidfile: PathBuf,
    pub port: u16,
    pub env: Vec<(String, String)>,
    pub max_memory_mb: u32,
    pub syslog_server: Option<String>,
    pub kill_exceeded_memory: bool,
    pub check_port: bool,
}

impl WatchConfig {
    /// Builds the config for an api-server watch: no memory-kill, no syslog.
    pub fn for_api_server(watch: Watch, start_cmd: String, pidfile: PathBuf, port: u16, max_memory_mb: u32) -> Self {
        Self {
            watch,
            start_cmd,
            pidfile,
            port,
            env: Vec::new(),
            max_memory_mb,
            syslog_server: None,
            kill_exceeded_memory: false,
            check_port: true,
        }
    }
}

/// Supervisor-reported state of a watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Running,
    Unmonitored,
    Other,
}

/// Thin facade over an out-of-process supervisor (e.g. Monit) reached over
/// its HTTP action endpoint.
#[async_trait]
pub trait SupervisorAdapter: Send + Sync {
    /// Materializes a configuration describing one managed process.
    async fn write_config(&self, config: WatchConfig) -> Result<(), AimError>;

    /// Instructs the supervisor to bring the process to `Running`.
    async fn start(&self, watch: &Watch) -> Result<(), AimError>;

    /// Removes supervision without killing the process. Retries on
    /// transient 503s; returns `SupervisorAbsent` on 404 rather than an
    /// error the caller needs to propagate.
    async fn unmonitor(&self, watch: &Watch) -> Result<(), AimError>;

    /// Deletes the watch's config file.
    async fn remove_config(&self, watch: &Watch) -> Result<(), AimError>;

    /// Asks the supervisor to re-read configurations.
    async fn reload(&self) -> Result<(), AimError>;

    /// Returns every entry the supervisor currently tracks, by watch name.
    async fn entries(&self) -> Result<HashMap<Watch, WatchState>, AimError>;
}

/// Unmonitor-then-remove-then-kill is the canonical teardown order: the
/// supervisor won't restart a process whose config has been removed only
/// after it has already stopped trying to keep it running.
pub async fn teardown(adapter: &dyn SupervisorAdapter, watch: &Watch) -> Result<(), AimError> {
    match adapter.unmonitor(watch).await {
        Ok(()) => {}
        Err(AimError::SupervisorAbsent(_)) => return Ok(()),
        Err(other) => return Err(other),
    }
    adapter.remove_config(watch).await
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
