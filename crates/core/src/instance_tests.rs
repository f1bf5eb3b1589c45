// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use super::*;
use crate::key::VersionKey;

fn revision(port_suffix: &str) -> RevisionKey {
    VersionKey::new("proj", "default", "v1").with_revision(port_suffix)
}

#[test]
fn instances_with_same_revision_and_port_are_equal() {
    let a = Instance::new(revision("3"), 8080);
    let b = Instance::new(revision("3"), 8080);
    assert_eq!(a, b);
}

#[test]
fn instances_differing_only_by_port_are_distinct() {
    let a = Instance::new(revision("3"), 8080);
    let b = Instance::new(revision("3"), 8081);
    assert_ne!(a, b);
}

#[test]
fn instance_version_key_drops_revision_component() {
    let instance = Instance::new(revision("3"), 8080);
    assert_eq!(instance.version_key(), VersionKey::new("proj", "default", "v1"));
}

#[test]
fn instance_entry_path_matches_registry_layout() {
    let instance = Instance::new(revision("3"), 8080);
    let entry = InstanceEntry::for_instance(&instance, "10.0.0.1");
    assert_eq!(entry.path(), "/registry/proj_default_v1/10.0.0.1:8080");
    assert_eq!(entry.revision_id, "3");
}
