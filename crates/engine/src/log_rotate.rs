// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Writes and removes the per-project logrotate script.
//!
//! One script per project lives under `LOGROTATE_CONFIG_DIR`; the
//! dashboard project gets a larger size budget than ordinary applications.

use std::path::{Path, PathBuf};

use aim_core::AimError;

pub const DASHBOARD_PROJECT_ID: &str = "appscaledashboard";
const APP_LOG_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DASHBOARD_LOG_SIZE_BYTES: u64 = 100 * 1024 * 1024;
const KEEP_ROTATIONS: u32 = 7;

pub struct LogRotateWriter {
    config_dir: PathBuf,
}

impl LogRotateWriter {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self { config_dir: config_dir.into() }
    }

    pub async fn install(&self, project_id: &str) -> Result<(), AimError> {
        let log_size = if project_id == DASHBOARD_PROJECT_ID { DASHBOARD_LOG_SIZE_BYTES } else { APP_LOG_SIZE_BYTES };
        let contents = render(project_id, log_size);
        tokio::fs::write(self.script_path(project_id), contents)
            .await
            .map_err(|err| AimError::Internal(format!("writing logrotate script for {project_id}: {err}")))
    }

    pub async fn remove(&self, project_id: &str) -> Result<(), AimError> {
        match tokio::fs::remove_file(self.script_path(project_id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AimError::Internal(format!("removing logrotate script for {project_id}: {err}"))),
        }
    }

    fn script_path(&self, project_id: &str) -> PathBuf {
        self.config_dir.join(format!("appscale-{project_id}"))
    }
}

fn render(project_id: &str, log_size: u64) -> String {
    format!(
        "/var/log/appscale/instance_{project_id}*.log {{\n  size {log_size}\n  missingok\n  rotate {KEEP_ROTATIONS}\n  compress\n  delaycompress\n  notifempty\n  copytruncate\n}}\n"
    )
}

pub fn script_path_for(config_dir: &Path, project_id: &str) -> PathBuf {
    config_dir.join(format!("appscale-{project_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_project_gets_larger_budget() {
        let dashboard = render(DASHBOARD_PROJECT_ID, DASHBOARD_LOG_SIZE_BYTES);
        let regular = render("myapp", APP_LOG_SIZE_BYTES);
        assert!(dashboard.contains(&DASHBOARD_LOG_SIZE_BYTES.to_string()));
        assert!(regular.contains(&APP_LOG_SIZE_BYTES.to_string()));
    }

    #[tokio::test]
    async fn install_then_remove_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LogRotateWriter::new(dir.path());
        writer.install("myapp").await.unwrap();
        assert!(script_path_for(dir.path(), "myapp").is_file());

        writer.remove("myapp").await.unwrap();
        assert!(!script_path_for(dir.path(), "myapp").is_file());
    }

    #[tokio::test]
    async fn remove_of_missing_script_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LogRotateWriter::new(dir.path());
        writer.remove("myapp").await.unwrap();
    }
}
