// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use std::collections::HashSet;

use aim_core::AimError;
use async_trait::async_trait;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::{getpgid, Pid};
use sysinfo::System;
use tracing::{info, warn};

use super::{ProcessInfo, ProcessTable};

const JAVA_APPSERVER_CLASS: &str = "com.google.appengine.tools.development.devappserver2.StandaloneInstance";
const PYTHON_APPSERVER_MARKER: &str = "dev_appserver.py";
const APPS_PATH_PREFIX: &str = "/opt/appscale/apps";

pub struct SysinfoProcessTable;

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SysinfoProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessTable for SysinfoProcessTable {
    async fn scan(&self) -> Result<Vec<ProcessInfo>, AimError> {
        let mut system = System::new();
        system.refresh_all();

        let mut found = Vec::new();
        for process in system.processes().values() {
            let cmd: Vec<String> = process.cmd().iter().map(|arg| arg.to_string_lossy().into_owned()).collect();
            if cmd.len() < 2 {
                continue;
            }

            let matched = if cmd.iter().any(|arg| arg == JAVA_APPSERVER_CLASS) {
                parse_java_launch(&cmd)
            } else if cmd[1].ends_with(PYTHON_APPSERVER_MARKER) {
                parse_python_launch(&cmd)
            } else {
                None
            };

            let Some((revision_id, port)) = matched else { continue };
            let pid = Pid::from_raw(process.pid().as_u32() as i32);
            let process_group = match getpgid(Some(pid)) {
                Ok(pgid) => pgid.as_raw(),
                Err(err) => {
                    warn!(pid = pid.as_raw(), %err, "failed to read process group, skipping");
                    continue;
                }
            };
            found.push(ProcessInfo { revision_id, port, process_group });
        }
        Ok(found)
    }

    async fn kill_unmonitored(&self, monitored: &HashSet<(String, u16)>) -> Result<usize, AimError> {
        let found = self.scan().await?;
        let to_kill: Vec<_> =
            found.into_iter().filter(|process| !monitored.contains(&(process.revision_id.clone(), process.port))).collect();

        if to_kill.is_empty() {
            return Ok(0);
        }

        info!(count = to_kill.len(), "killing unmonitored instance processes");
        for process in &to_kill {
            if let Err(err) = killpg(Pid::from_raw(process.process_group), Signal::SIGKILL) {
                warn!(group = process.process_group, %err, "failed to kill process group");
            }
        }
        Ok(to_kill.len())
    }
}

/// Parses the revision and port out of a Java launch command line, whose
/// last argument is the per-revision application directory and which
/// carries its port as `--port=N`.
fn parse_java_launch(cmd: &[String]) -> Option<(String, u16)> {
    let app_dir = cmd.last()?;
    let revision_id = app_dir.trim_end_matches('/').rsplit('/').nth(1)?.to_string();
    let port_arg = cmd.iter().find(|arg| arg.starts_with("--port="))?;
    let port: u16 = port_arg.trim_start_matches("--port=").parse().ok()?;
    Some((revision_id, port))
}

/// Parses the revision and port out of a Python launch command line, whose
/// source-directory argument lives under the apps root and whose port
/// follows a standalone `--port` flag.
fn parse_python_launch(cmd: &[String]) -> Option<(String, u16)> {
    let source_arg = cmd.iter().find(|arg| arg.starts_with(APPS_PATH_PREFIX))?;
    let revision_id = source_arg.trim_end_matches('/').rsplit('/').nth(1)?.to_string();
    let port_index = cmd.iter().position(|arg| arg == "--port")?;
    let port: u16 = cmd.get(port_index + 1)?.parse().ok()?;
    Some((revision_id, port))
}
