// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use aim_core::VersionKey;

use super::*;

#[tokio::test]
async fn fake_returns_seeded_down_instances() {
    let client = FakeLoadBalancerStatsClient::new();
    let down = DownInstance { version_key: VersionKey::new("proj", "default", "v1"), port: 8080 };
    client.mark_down(down.clone());

    let found = client.fetch_down_instances("10.0.0.1").await.unwrap();
    assert!(found.contains(&down));
}

#[tokio::test]
async fn fake_clear_resets_state() {
    let client = FakeLoadBalancerStatsClient::new();
    client.mark_down(DownInstance { version_key: VersionKey::new("proj", "default", "v1"), port: 8080 });
    client.clear();

    let found = client.fetch_down_instances("10.0.0.1").await.unwrap();
    assert!(found.is_empty());
}
