// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use std::collections::HashMap;

use aim_core::{AimError, VersionKey};
use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ProjectsModel, VersionRecord};

#[derive(Default)]
pub struct FakeProjectsModel {
    records: Mutex<HashMap<VersionKey, VersionRecord>>,
}

impl FakeProjectsModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, version_key: VersionKey, record: VersionRecord) {
        self.records.lock().insert(version_key, record);
    }
}

#[async_trait]
impl ProjectsModel for FakeProjectsModel {
    async fn version_record(&self, version_key: &VersionKey) -> Result<VersionRecord, AimError> {
        self.records
            .lock()
            .get(version_key)
            .cloned()
            .ok_or_else(|| AimError::BadConfiguration(format!("unknown version {version_key}")))
    }
}
