// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Best-effort termination of an instance's child process after the
//! supervisor has stopped managing it.
//!
//! The supervisor's own stop already sends a graceful signal; this waits a
//! grace period for the process to exit on its own and only then sends
//! `SIGKILL` to its process group, matching the teardown order in the
//! supervisor adapter facade (unmonitor, then remove config, then kill).

use std::path::{Path, PathBuf};
use std::time::Duration;

use nix::sys::signal::{kill, killpg, Signal};
use nix::unistd::{getpgid, Pid};
use tracing::warn;

pub const GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Reads `pidfile`, waits [`GRACE_PERIOD`], and sends `SIGKILL` to the
/// process group if the process is still alive. Any failure (missing
/// pidfile, already-exited process) is logged and swallowed — by this
/// point the instance is already gone from the registry and the
/// supervisor's view, so there is nothing left to surface to a caller.
pub async fn terminate_after_grace(pidfile: PathBuf) {
    tokio::time::sleep(GRACE_PERIOD).await;

    let Some(pid) = read_pid(&pidfile).await else { return };
    if kill(pid, None).is_err() {
        return;
    }

    match getpgid(Some(pid)) {
        Ok(pgid) => {
            if let Err(err) = killpg(pgid, Signal::SIGKILL) {
                warn!(pid = pid.as_raw(), %err, "failed to kill lingering instance process group");
            }
        }
        Err(err) => warn!(pid = pid.as_raw(), %err, "failed to resolve process group for lingering instance"),
    }
}

async fn read_pid(pidfile: &Path) -> Option<Pid> {
    let contents = tokio::fs::read_to_string(pidfile).await.ok()?;
    let raw: i32 = contents.trim().parse().ok()?;
    Some(Pid::from_raw(raw))
}
