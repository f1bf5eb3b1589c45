// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Supervisor adapter that speaks to an out-of-process supervisor over its
//! HTTP action endpoint (`POST .../{watch}?action=...`).

use std::collections::HashMap;
use std::time::Duration;

use aim_core::{AimError, Watch};
use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use super::{SupervisorAdapter, WatchConfig, WatchState};

const UNMONITOR_RETRIES: u32 = 5;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Talks to a supervisor exposing an HTTP action endpoint, a listing
/// endpoint, and a reload endpoint, matching the interface assumed in the
/// external interfaces section of the design.
pub struct HttpSupervisorAdapter {
    client: Client,
    base_url: String,
    config_dir: std::path::PathBuf,
}

impl HttpSupervisorAdapter {
    pub fn new(base_url: impl Into<String>, config_dir: impl Into<std::path::PathBuf>) -> Self {
        Self { client: Client::new(), base_url: base_url.into(), config_dir: config_dir.into() }
    }

    fn config_path(&self, watch: &Watch) -> std::path::PathBuf {
        self.config_dir.join(watch.to_string())
    }
}

#[async_trait]
impl SupervisorAdapter for HttpSupervisorAdapter {
    async fn write_config(&self, config: WatchConfig) -> Result<(), AimError> {
        let contents = render_config(&config);
        let path = self.config_path(&config.watch);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|err| AimError::Internal(format!("writing supervisor config: {err}")))
    }

    async fn start(&self, watch: &Watch) -> Result<(), AimError> {
        let url = format!("{}/{}", self.base_url, watch);
        let response = self
            .client
            .post(&url)
            .form(&[("action", "start")])
            .send()
            .await
            .map_err(|err| AimError::SupervisorStartFailed(format!("{watch}: {err}")))?;
        if !response.status().is_success() {
            return Err(AimError::SupervisorStartFailed(format!("{watch}: status {}", response.status())));
        }
        Ok(())
    }

    async fn unmonitor(&self, watch: &Watch) -> Result<(), AimError> {
        let url = format!("{}/{}", self.base_url, watch);
        let mut retries_left = UNMONITOR_RETRIES;
        loop {
            let response = self
                .client
                .post(&url)
                .form(&[("action", "unmonitor")])
                .send()
                .await
                .map_err(|err| AimError::SupervisorTransient(format!("{watch}: {err}")))?;

            match response.status().as_u16() {
                200..=299 => return Ok(()),
                404 => return Err(AimError::SupervisorAbsent(watch.to_string())),
                503 => {
                    if retries_left == 0 {
                        return Err(AimError::SupervisorTransient(format!("{watch}: exhausted retries")));
                    }
                    retries_left -= 1;
                    warn!(%watch, retries_left, "supervisor returned 503 for unmonitor, retrying");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                status => return Err(AimError::SupervisorTransient(format!("{watch}: status {status}"))),
            }
        }
    }

    async fn remove_config(&self, watch: &Watch) -> Result<(), AimError> {
        let path = self.config_path(watch);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AimError::Internal(format!("removing supervisor config: {err}"))),
        }
    }

    async fn reload(&self) -> Result<(), AimError> {
        let url = format!("{}/_reload", self.base_url);
        self.client
            .post(&url)
            .send()
            .await
            .map_err(|err| AimError::SupervisorTransient(format!("reload: {err}")))?;
        Ok(())
    }

    async fn entries(&self) -> Result<HashMap<Watch, WatchState>, AimError> {
        let url = format!("{}/_status", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| AimError::SupervisorTransient(format!("entries: {err}")))?;
        let raw: HashMap<String, String> = response
            .json()
            .await
            .map_err(|err| AimError::Internal(format!("parsing supervisor status: {err}")))?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (name, state) in raw {
            let watch = match Watch::parse(&name) {
                Ok(watch) => watch,
                Err(_) => continue,
            };
            let state = match state.as_str() {
                "Running" => WatchState::Running,
                "Unmonitored" => WatchState::Unmonitored,
                _ => WatchState::Other,
            };
            entries.insert(watch, state);
        }
        Ok(entries)
    }
}

fn render_config(config: &WatchConfig) -> String {
    let env_lines: String =
        config.env.iter().map(|(key, value)| format!("env {key}={value}\n")).collect::<Vec<_>>().join("");
    format!(
        "check process {watch}\n  start program = \"{cmd}\"\n  pidfile {pidfile}\n  port {port} protocol http\n{env}  max memory {mem} MB\n  kill_exceeded_memory {kill}\n  check_port {check}\n  syslog {syslog}\n",
        watch = config.watch,
        cmd = config.start_cmd,
        pidfile = config.pidfile.display(),
        port = config.port,
        env = env_lines,
        mem = config.max_memory_mb,
        kill = config.kill_exceeded_memory,
        check = config.check_port,
        syslog = config.syslog_server.as_deref().unwrap_or("-"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aim_core::Watch;

    #[test]
    fn render_config_includes_env_and_limits() {
        let config = WatchConfig {
            watch: Watch::api_server("proj", 19999),
            start_cmd: "/bin/true".into(),
            pidfile: "/var/run/aim/apisrv_proj-19999.pid".into(),
            port: 19999,
            env: vec![("FOO".into(), "bar".into())],
            max_memory_mb: 512,
            syslog_server: Some("10.0.0.1".into()),
            kill_exceeded_memory: true,
            check_port: true,
        };
        let rendered = render_config(&config);
        assert!(rendered.contains("env FOO=bar"));
        assert!(rendered.contains("max memory 512 MB"));
        assert!(rendered.contains("syslog 10.0.0.1"));
    }
}
