// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use aim_core::{AimError, VersionKey};
use async_trait::async_trait;

use super::{ProjectsModel, VersionRecord};

pub struct HttpProjectsModel {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProjectsModel {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into() }
    }
}

#[async_trait]
impl ProjectsModel for HttpProjectsModel {
    async fn version_record(&self, version_key: &VersionKey) -> Result<VersionRecord, AimError> {
        let url = format!("{}/projects/{}", self.base_url, version_key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| AimError::Internal(format!("version_record {version_key}: {err}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AimError::BadConfiguration(format!("unknown version {version_key}")));
        }
        if !response.status().is_success() {
            return Err(AimError::Internal(format!("version_record {version_key}: status {}", response.status())));
        }

        response.json().await.map_err(|err| AimError::BadConfiguration(format!("version_record {version_key}: {err}")))
    }
}
