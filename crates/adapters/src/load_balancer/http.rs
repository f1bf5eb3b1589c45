// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use std::collections::HashSet;

use aim_core::{AimError, VersionKey};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;

use super::{DownInstance, LoadBalancerStatsClient};

const HERMES_PORT: u16 = 4378;
const PROXY_NAME_PREFIX: &str = "gae_";

pub struct HttpLoadBalancerStatsClient {
    client: reqwest::Client,
    load_balancer_ips: Vec<String>,
    secret: String,
}

impl HttpLoadBalancerStatsClient {
    pub fn new(load_balancer_ips: Vec<String>, secret: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), load_balancer_ips, secret: secret.into() }
    }
}

#[derive(Deserialize)]
struct ProxiesResponse {
    proxies_stats: Vec<ProxyStats>,
}

#[derive(Deserialize)]
struct ProxyStats {
    name: String,
    servers: Vec<ServerStats>,
}

#[derive(Deserialize)]
struct ServerStats {
    private_ip: String,
    port: u16,
    status: String,
}

#[async_trait]
impl LoadBalancerStatsClient for HttpLoadBalancerStatsClient {
    async fn fetch_down_instances(&self, node_ip: &str) -> Result<HashSet<DownInstance>, AimError> {
        let load_balancer = self
            .load_balancer_ips
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| AimError::Internal("no load balancer IPs configured".into()))?;

        let url = format!("http://{load_balancer}:{HERMES_PORT}/stats/local/proxies");
        let payload = serde_json::json!({
            "include_lists": {
                "proxy": ["name", "servers"],
                "proxy.server": ["private_ip", "port", "status"],
            }
        });

        let response = self
            .client
            .post(&url)
            .header("AppScale-Secret", &self.secret)
            .json(&payload)
            .send()
            .await
            .map_err(|err| AimError::Internal(format!("fetch_down_instances: {err}")))?;

        let parsed: ProxiesResponse =
            response.json().await.map_err(|err| AimError::Internal(format!("fetch_down_instances parse: {err}")))?;

        let mut down = HashSet::new();
        for proxy in parsed.proxies_stats {
            let Some(version_str) = proxy.name.strip_prefix(PROXY_NAME_PREFIX) else { continue };
            let Ok(version_key) = VersionKey::parse(version_str) else { continue };
            for server in proxy.servers {
                if server.private_ip != node_ip {
                    continue;
                }
                if !server.status.starts_with("DOWN") {
                    continue;
                }
                down.insert(DownInstance { version_key: version_key.clone(), port: server.port });
            }
        }
        Ok(down)
    }
}
