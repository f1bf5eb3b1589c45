// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Process-wide configuration read once at boot from the environment.
//!
//! Nothing here is reloaded after startup — cluster-info values are
//! materialized into a single [`Config`] and passed down by reference.

use std::path::PathBuf;

/// Everything `main` needs to wire the engine together. Every field is
/// read once, at boot, from `AIM_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub private_ip: String,
    pub head_node_ip: String,
    pub db_proxy: String,
    pub tq_proxy: String,
    pub secret: String,
    pub load_balancer_ips: Vec<String>,
    pub projects_base_url: String,
    pub supervisor_base_url: String,
    pub supervisor_config_dir: PathBuf,
    pub registry_base_url: String,
    pub unpack_root: PathBuf,
    pub pidfile_dir: PathBuf,
    pub logrotate_config_dir: PathBuf,
}

const DEFAULT_HTTP_PORT: u16 = 17445;

impl Config {
    /// Reads every field from the environment, applying documented
    /// defaults where the original deployment tooling has one.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            http_port: env_parsed("AIM_HTTP_PORT").unwrap_or(DEFAULT_HTTP_PORT),
            private_ip: require_env("AIM_PRIVATE_IP")?,
            head_node_ip: require_env("AIM_HEAD_NODE_IP")?,
            db_proxy: require_env("AIM_DB_PROXY")?,
            tq_proxy: require_env("AIM_TQ_PROXY")?,
            secret: require_env("AIM_SECRET")?,
            load_balancer_ips: require_env("AIM_LOAD_BALANCER_IPS")?
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            projects_base_url: require_env("AIM_PROJECTS_BASE_URL")?,
            supervisor_base_url: require_env("AIM_SUPERVISOR_BASE_URL")?,
            supervisor_config_dir: env_or("AIM_SUPERVISOR_CONFIG_DIR", "/etc/appscale/monit").into(),
            registry_base_url: require_env("AIM_REGISTRY_BASE_URL")?,
            unpack_root: env_or("AIM_UNPACK_ROOT", "/opt/appscale/apps").into(),
            pidfile_dir: env_or("AIM_PIDFILE_DIR", "/var/run/appscale").into(),
            logrotate_config_dir: env_or("AIM_LOGROTATE_CONFIG_DIR", "/etc/logrotate.d").into(),
        })
    }
}

fn require_env(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("missing required environment variable {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|raw| raw.parse().ok())
}
