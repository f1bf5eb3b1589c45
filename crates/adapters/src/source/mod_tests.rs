// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use std::collections::HashSet;

use aim_core::test_support::revision_key;
use aim_core::Runtime;

use super::*;

#[tokio::test]
async fn ensure_is_idempotent() {
    let store = FakeSourceStore::new();
    let key = revision_key("proj", "default", "v1", "1");

    store.ensure(&key, "https://example.invalid/app.zip", Runtime::Python27).await.unwrap();
    assert!(store.is_ensured(&key));

    store.ensure(&key, "https://example.invalid/app.zip", Runtime::Python27).await.unwrap();
    assert!(store.is_ensured(&key));
}

#[tokio::test]
async fn ensure_surfaces_fetch_failure() {
    let store = FakeSourceStore::new();
    let key = revision_key("proj", "default", "v1", "1");
    store.fail_url("https://example.invalid/broken.zip");

    let result = store.ensure(&key, "https://example.invalid/broken.zip", Runtime::Go).await;
    assert!(matches!(result, Err(AimError::SourceStore(_))));
    assert!(!store.is_ensured(&key));
}

#[tokio::test]
async fn clean_old_revisions_drops_inactive_entries() {
    let store = FakeSourceStore::new();
    let keep = revision_key("proj", "default", "v1", "1");
    let drop = revision_key("proj", "default", "v1", "2");

    store.ensure(&keep, "https://example.invalid/a.zip", Runtime::Php).await.unwrap();
    store.ensure(&drop, "https://example.invalid/b.zip", Runtime::Php).await.unwrap();

    let mut active = HashSet::new();
    active.insert(keep.to_string());
    store.clean_old_revisions(&active).await.unwrap();

    assert!(store.is_ensured(&keep));
    assert!(!store.is_ensured(&drop));
    assert_eq!(store.last_cleaned(), Some(active));
}

#[test]
fn directories_are_scoped_by_revision() {
    let store = FakeSourceStore::new();
    let key = revision_key("proj", "default", "v1", "1");
    assert!(store.app_directory(&key).ends_with("app"));
    assert!(store.gopath_directory(&key).ends_with("gopath"));
    assert_ne!(store.app_directory(&key), store.gopath_directory(&key));
}
