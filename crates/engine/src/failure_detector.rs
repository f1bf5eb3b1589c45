// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Periodically asks the load balancer which locally-hosted instances it
//! considers down, and routes them through the stop-one path.
//!
//! Ticks never overlap themselves: if a tick is still running when the
//! next timer fires, the next is skipped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use aim_adapters::LoadBalancerStatsClient;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use crate::lifecycle::LifecycleEngine;

pub const TICK_INTERVAL: Duration = Duration::from_secs(30);

pub struct FailureDetector {
    load_balancer: Arc<dyn LoadBalancerStatsClient>,
    engine: Arc<LifecycleEngine>,
    node_ip: String,
    running: AsyncMutex<()>,
}

impl FailureDetector {
    pub fn new(load_balancer: Arc<dyn LoadBalancerStatsClient>, engine: Arc<LifecycleEngine>, node_ip: impl Into<String>) -> Self {
        Self { load_balancer, engine, node_ip: node_ip.into(), running: AsyncMutex::new(()) }
    }

    /// Runs one tick: fetches the down set and stops every locally-running
    /// instance in it. Skips entirely (rather than queuing) if a previous
    /// tick is still in flight.
    pub async fn tick(&self) {
        let Ok(_guard) = self.running.try_lock() else {
            warn!("failure detector tick still running, skipping this interval");
            return;
        };

        let down = match self.load_balancer.fetch_down_instances(&self.node_ip).await {
            Ok(down) => down,
            Err(err) => {
                warn!(%err, "failed to fetch load balancer stats");
                return;
            }
        };

        let running = self.engine.running_versions_and_ports();
        for down_instance in down {
            if !running.contains(&(down_instance.version_key.clone(), down_instance.port)) {
                continue;
            }
            info!(version_key = %down_instance.version_key, port = down_instance.port, "load balancer marked instance down, stopping");
            if let Err(err) = self.engine.stop_one_from_detector(&down_instance.version_key, down_instance.port).await {
                warn!(%err, version_key = %down_instance.version_key, port = down_instance.port, "failure detector stop_one failed");
            }
        }
    }

    /// Runs [`tick`](Self::tick) on a fixed interval until `shutdown`
    /// resolves. Intended to be spawned as a background task.
    pub async fn run(self: Arc<Self>, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = interval.tick() => self.tick().await,
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "failure_detector_tests.rs"]
mod tests;
