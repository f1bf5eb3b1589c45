// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! In-memory supervisor used by engine and daemon tests.

use std::collections::HashMap;

use aim_core::{AimError, Watch};
use async_trait::async_trait;
use parking_lot::Mutex;

use super::{SupervisorAdapter, WatchConfig, WatchState};

/// One call observed by a `FakeSupervisorAdapter`, for assertions in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorCall {
    WriteConfig(Watch),
    Start(Watch),
    Unmonitor(Watch),
    RemoveConfig(Watch),
    Reload,
}

#[derive(Default)]
struct Inner {
    configs: HashMap<Watch, WatchConfig>,
    states: HashMap<Watch, WatchState>,
    calls: Vec<SupervisorCall>,
    /// Watches that should behave as if the supervisor already forgot them
    /// (unmonitor returns 404-equivalent).
    absent: std::collections::HashSet<Watch>,
}

/// An in-memory stand-in for the out-of-process supervisor.
pub struct FakeSupervisorAdapter {
    inner: Mutex<Inner>,
}

impl Default for FakeSupervisorAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSupervisorAdapter {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }

    /// Seeds an entry as already known to the supervisor, e.g. to simulate
    /// state left over from before a restart.
    pub fn seed(&self, watch: Watch, state: WatchState) {
        self.inner.lock().states.insert(watch, state);
    }

    /// Marks a watch as absent from the supervisor (unmonitor -> 404).
    pub fn mark_absent(&self, watch: Watch) {
        self.inner.lock().absent.insert(watch);
    }

    pub fn calls(&self) -> Vec<SupervisorCall> {
        self.inner.lock().calls.clone()
    }

    pub fn call_count(&self, watch: &Watch, matches: impl Fn(&SupervisorCall) -> bool) -> usize {
        self.inner.lock().calls.iter().filter(|call| matches(call) && watch_of(call) == Some(watch)).count()
    }
}

fn watch_of(call: &SupervisorCall) -> Option<&Watch> {
    match call {
        SupervisorCall::WriteConfig(w)
        | SupervisorCall::Start(w)
        | SupervisorCall::Unmonitor(w)
        | SupervisorCall::RemoveConfig(w) => Some(w),
        SupervisorCall::Reload => None,
    }
}

#[async_trait]
impl SupervisorAdapter for FakeSupervisorAdapter {
    async fn write_config(&self, config: WatchConfig) -> Result<(), AimError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SupervisorCall::WriteConfig(config.watch.clone()));
        inner.configs.insert(config.watch.clone(), config);
        Ok(())
    }

    async fn start(&self, watch: &Watch) -> Result<(), AimError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SupervisorCall::Start(watch.clone()));
        inner.states.insert(watch.clone(), WatchState::Running);
        Ok(())
    }

    async fn unmonitor(&self, watch: &Watch) -> Result<(), AimError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SupervisorCall::Unmonitor(watch.clone()));
        if inner.absent.contains(watch) || !inner.states.contains_key(watch) {
            return Err(AimError::SupervisorAbsent(watch.to_string()));
        }
        inner.states.insert(watch.clone(), WatchState::Unmonitored);
        Ok(())
    }

    async fn remove_config(&self, watch: &Watch) -> Result<(), AimError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SupervisorCall::RemoveConfig(watch.clone()));
        inner.configs.remove(watch);
        inner.states.remove(watch);
        Ok(())
    }

    async fn reload(&self) -> Result<(), AimError> {
        self.inner.lock().calls.push(SupervisorCall::Reload);
        Ok(())
    }

    async fn entries(&self) -> Result<HashMap<Watch, WatchState>, AimError> {
        Ok(self.inner.lock().states.clone())
    }
}
