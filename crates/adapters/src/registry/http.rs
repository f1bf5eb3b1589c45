// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Registry client backed by a generic hierarchical key-value HTTP gateway
//! in front of the cluster's coordination store.
//!
//! The coordination store's own wire client is an external collaborator
//! (see the purpose and scope notes); this adapter only needs a narrow
//! put/delete/list-prefix interface, which is implemented here as plain
//! REST calls rather than pulling in a store-specific driver.

use std::collections::HashSet;

use aim_core::{AimError, Instance, VersionKey};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::RegistryClient;

const REGISTRY_ROOT: &str = "/registry";

#[derive(Deserialize)]
struct KvEntry {
    key: String,
    value: String,
}

pub struct HttpRegistryClient {
    client: Client,
    base_url: String,
    node_ip: String,
}

impl HttpRegistryClient {
    pub fn new(base_url: impl Into<String>, node_ip: impl Into<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into(), node_ip: node_ip.into() }
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn declare(&self, instance: &Instance) -> Result<(), AimError> {
        let entry = aim_core::InstanceEntry::for_instance(instance, &self.node_ip);
        self.ensure_version_prefix(&instance.version_key()).await?;
        let url = format!("{}/kv{}", self.base_url, entry.path());
        let response = self
            .client
            .put(&url)
            .body(entry.revision_id.clone())
            .send()
            .await
            .map_err(|err| AimError::Internal(format!("declare {entry:?}: {err}")))?;
        // Overwrite semantics: both a fresh create (201) and an update of an
        // existing node (200) are success; the store's own exists-check is
        // irrelevant to the caller.
        if !response.status().is_success() {
            return Err(AimError::Internal(format!("declare {}: status {}", entry.path(), response.status())));
        }
        Ok(())
    }

    async fn retract(&self, instance: &Instance) -> Result<(), AimError> {
        let entry = aim_core::InstanceEntry::for_instance(instance, &self.node_ip);
        let url = format!("{}/kv{}", self.base_url, entry.path());
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|err| AimError::Internal(format!("retract {}: {err}", entry.path())))?;
        // A node that is already gone is success, not an error.
        if response.status() == StatusCode::NOT_FOUND || response.status().is_success() {
            return Ok(());
        }
        Err(AimError::Internal(format!("retract {}: status {}", entry.path(), response.status())))
    }

    async fn list_local(&self) -> Result<HashSet<Instance>, AimError> {
        let url = format!("{}/kv{}?prefix=true", self.base_url, REGISTRY_ROOT);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| AimError::Internal(format!("list_local: {err}")))?;
        let entries: Vec<KvEntry> =
            response.json().await.map_err(|err| AimError::Internal(format!("list_local parse: {err}")))?;

        let mut instances = HashSet::new();
        for entry in entries {
            let Some(parsed) = parse_registry_key(&entry.key) else { continue };
            let (version_key, node_ip, port) = parsed;
            if node_ip != self.node_ip {
                continue;
            }
            let revision_key = version_key.with_revision(entry.value);
            instances.insert(Instance::new(revision_key, port));
        }
        Ok(instances)
    }

    async fn ensure_version_prefix(&self, version_key: &VersionKey) -> Result<(), AimError> {
        let url = format!("{}/kv{}/{}/", self.base_url, REGISTRY_ROOT, version_key);
        self.client
            .put(&url)
            .body("")
            .send()
            .await
            .map_err(|err| AimError::Internal(format!("ensure_version_prefix {version_key}: {err}")))?;
        Ok(())
    }
}

/// Parses `/registry/{version_key}/{node_ip}:{port}` into its parts.
fn parse_registry_key(key: &str) -> Option<(VersionKey, String, u16)> {
    let rest = key.strip_prefix(REGISTRY_ROOT)?.strip_prefix('/')?;
    let (version_str, entry) = rest.split_once('/')?;
    let (node_ip, port_str) = entry.rsplit_once(':')?;
    let version_key = VersionKey::parse(version_str).ok()?;
    let port = port_str.parse().ok()?;
    Some((version_key, node_ip.to_string(), port))
}
