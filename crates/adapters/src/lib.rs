// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! aim-adapters: thin facades over the external collaborators the lifecycle
//! engine depends on — the out-of-process supervisor, the coordination
//! store, the source archive store, the load balancer stats feed, the
//! scheduler's projects model, and the OS process table.

pub mod load_balancer;
pub mod process_table;
pub mod projects;
pub mod registry;
pub mod source;
pub mod supervisor;

pub use load_balancer::{DownInstance, LoadBalancerStatsClient};
pub use process_table::{ProcessInfo, ProcessTable};
pub use projects::{ProjectsModel, VersionRecord};
pub use registry::RegistryClient;
pub use source::SourceStore;
pub use supervisor::{teardown, SupervisorAdapter, WatchConfig, WatchState};

#[cfg(any(test, feature = "test-support"))]
pub use load_balancer::FakeLoadBalancerStatsClient;
#[cfg(any(test, feature = "test-support"))]
pub use process_table::FakeProcessTable;
#[cfg(any(test, feature = "test-support"))]
pub use projects::FakeProjectsModel;
#[cfg(any(test, feature = "test-support"))]
pub use registry::FakeRegistryClient;
#[cfg(any(test, feature = "test-support"))]
pub use source::FakeSourceStore;
#[cfg(any(test, feature = "test-support"))]
pub use supervisor::FakeSupervisorAdapter;
