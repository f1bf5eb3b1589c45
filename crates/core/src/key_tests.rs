// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use super::*;

#[test]
fn version_key_round_trips_through_display_and_parse() {
    let key = VersionKey::new("proj", "default", "v1");
    let parsed = VersionKey::parse(&key.to_string()).unwrap();
    assert_eq!(key, parsed);
}

#[test]
fn version_key_parse_rejects_wrong_component_count() {
    assert!(VersionKey::parse("proj_default").is_err());
    assert!(VersionKey::parse("proj_default_v1_extra").is_err());
}

#[test]
fn revision_key_derives_version_key_prefix() {
    let version = VersionKey::new("proj", "default", "v1");
    let revision = version.with_revision("3");
    assert_eq!(revision.version_key(), version);
    assert_eq!(revision.to_string(), "proj_default_v1_3");
}

#[test]
fn revision_key_round_trips_through_display_and_parse() {
    let revision = RevisionKey::parse("proj_default_v1_3").unwrap();
    assert_eq!(revision.to_string(), "proj_default_v1_3");
}
