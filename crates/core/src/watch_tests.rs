// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use super::*;
use crate::key::VersionKey;

#[test]
fn instance_watch_round_trips_through_display_and_parse() {
    let revision_key = VersionKey::new("proj", "default", "v1").with_revision("3");
    let watch = Watch::instance(revision_key, 8080);
    let name = watch.to_string();
    assert_eq!(name, "instance_proj_default_v1_3-8080");
    assert_eq!(Watch::parse(&name).unwrap(), watch);
}

#[test]
fn api_server_watch_round_trips_through_display_and_parse() {
    let watch = Watch::api_server("proj", 19999);
    let name = watch.to_string();
    assert_eq!(name, "apisrv_proj-19999");
    assert_eq!(Watch::parse(&name).unwrap(), watch);
}

#[test]
fn parse_rejects_unknown_prefix() {
    assert!(Watch::parse("bogus_thing-1000").is_err());
}

#[test]
fn parse_rejects_missing_port_suffix() {
    assert!(Watch::parse("apisrv_proj").is_err());
}

#[test]
fn parse_rejects_non_numeric_port() {
    assert!(Watch::parse("apisrv_proj-notaport").is_err());
}

#[test]
fn kind_distinguishes_families() {
    assert_eq!(Watch::api_server("proj", 1).kind(), WatchKind::ApiServer);
    let revision_key = VersionKey::new("proj", "default", "v1").with_revision("3");
    assert_eq!(Watch::instance(revision_key, 1).kind(), WatchKind::Instance);
}
