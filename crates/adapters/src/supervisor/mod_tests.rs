// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use super::*;
use aim_core::Watch;

#[tokio::test]
async fn teardown_unmonitors_then_removes_config() {
    let supervisor = FakeSupervisorAdapter::new();
    let watch = Watch::api_server("proj", 19999);
    supervisor.seed(watch.clone(), WatchState::Running);

    teardown(&supervisor, &watch).await.unwrap();

    let calls = supervisor.calls();
    assert_eq!(calls[0], SupervisorCall::Unmonitor(watch.clone()));
    assert_eq!(calls[1], SupervisorCall::RemoveConfig(watch));
}

#[tokio::test]
async fn teardown_swallows_already_absent_watch() {
    let supervisor = FakeSupervisorAdapter::new();
    let watch = Watch::api_server("proj", 19999);
    supervisor.mark_absent(watch.clone());

    let result = teardown(&supervisor, &watch).await;
    assert!(result.is_ok());
    // remove_config should not be reached when unmonitor reports absent.
    assert!(supervisor.calls().iter().all(|call| !matches!(call, SupervisorCall::RemoveConfig(_))));
}
