// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use std::collections::HashSet;

use aim_core::AimError;
use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ProcessInfo, ProcessTable};

#[derive(Default)]
struct Inner {
    processes: Vec<ProcessInfo>,
    killed_groups: Vec<i32>,
}

/// Simulates a process table seeded with fake rogue entries.
#[derive(Default)]
pub struct FakeProcessTable {
    inner: Mutex<Inner>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, process: ProcessInfo) {
        self.inner.lock().processes.push(process);
    }

    pub fn killed_groups(&self) -> Vec<i32> {
        self.inner.lock().killed_groups.clone()
    }
}

#[async_trait]
impl ProcessTable for FakeProcessTable {
    async fn scan(&self) -> Result<Vec<ProcessInfo>, AimError> {
        Ok(self.inner.lock().processes.clone())
    }

    async fn kill_unmonitored(&self, monitored: &HashSet<(String, u16)>) -> Result<usize, AimError> {
        let mut inner = self.inner.lock();
        let (to_kill, to_keep): (Vec<_>, Vec<_>) =
            inner.processes.drain(..).partition(|process| !monitored.contains(&(process.revision_id.clone(), process.port)));
        inner.processes = to_keep;
        let killed = to_kill.len();
        inner.killed_groups.extend(to_kill.into_iter().map(|process| process.process_group));
        Ok(killed)
    }
}
