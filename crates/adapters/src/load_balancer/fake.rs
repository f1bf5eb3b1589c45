// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use std::collections::HashSet;

use aim_core::AimError;
use async_trait::async_trait;
use parking_lot::Mutex;

use super::{DownInstance, LoadBalancerStatsClient};

/// Returns a fixed, settable set of down instances, ignoring `node_ip`
/// filtering (tests seed exactly what they want the caller to observe).
#[derive(Default)]
pub struct FakeLoadBalancerStatsClient {
    down: Mutex<HashSet<DownInstance>>,
}

impl FakeLoadBalancerStatsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_down(&self, instance: DownInstance) {
        self.down.lock().insert(instance);
    }

    pub fn clear(&self) {
        self.down.lock().clear();
    }
}

#[async_trait]
impl LoadBalancerStatsClient for FakeLoadBalancerStatsClient {
    async fn fetch_down_instances(&self, _node_ip: &str) -> Result<HashSet<DownInstance>, AimError> {
        Ok(self.down.lock().clone())
    }
}
