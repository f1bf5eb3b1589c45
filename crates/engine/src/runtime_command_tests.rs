// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

use std::collections::BTreeMap;
use std::path::PathBuf;

use aim_core::test_support::revision_key;
use aim_core::Runtime;

use super::*;

fn base_params<'a>(
    revision_key: &'a RevisionKey,
    app_dir: &'a PathBuf,
    pidfile: &'a PathBuf,
    env_variables: &'a BTreeMap<String, String>,
) -> CommandParams<'a> {
    CommandParams {
        project_id: "proj",
        revision_key,
        port: 8080,
        api_server_port: 19999,
        login_server: "10.0.0.1",
        private_ip: "10.0.0.2",
        db_proxy: "10.0.0.3",
        tq_proxy: "10.0.0.4",
        pidfile,
        app_dir,
        gopath_dir: None,
        web_inf_dir: None,
        max_memory_mb: 400,
        env_variables,
        trusted: false,
    }
}

#[test]
fn python_build_includes_app_port_and_admin_port() {
    let revision = revision_key("proj", "default", "v1", "3");
    let app_dir = PathBuf::from("/opt/appscale/apps/proj_default_v1_3/app");
    let pidfile = PathBuf::from("/var/run/aim/app___proj_default_v1_3-8080.pid");
    let env = BTreeMap::new();
    let params = base_params(&revision, &app_dir, &pidfile, &env);

    let built = build(Runtime::Python27, &params).unwrap();
    assert!(built.start_cmd.contains("--port 8080"));
    assert!(built.start_cmd.contains("--admin_port 18080"));
    assert!(!built.start_cmd.contains(TRUSTED_FLAG));
}

#[test]
fn python_build_adds_trusted_flag_when_requested() {
    let revision = revision_key("proj", "default", "v1", "3");
    let app_dir = PathBuf::from("/opt/appscale/apps/proj_default_v1_3/app");
    let pidfile = PathBuf::from("/var/run/aim/app___proj_default_v1_3-8080.pid");
    let env = BTreeMap::new();
    let mut params = base_params(&revision, &app_dir, &pidfile, &env);
    params.trusted = true;

    let built = build(Runtime::Python27, &params).unwrap();
    assert!(built.start_cmd.ends_with(TRUSTED_FLAG));
}

#[test]
fn go_build_sets_gopath_and_goroot() {
    let revision = revision_key("proj", "default", "v1", "3");
    let app_dir = PathBuf::from("/opt/appscale/apps/proj_default_v1_3/app");
    let gopath = PathBuf::from("/opt/appscale/apps/proj_default_v1_3/gopath");
    let pidfile = PathBuf::from("/var/run/aim/app___proj_default_v1_3-8080.pid");
    let env = BTreeMap::new();
    let mut params = base_params(&revision, &app_dir, &pidfile, &env);
    params.gopath_dir = Some(&gopath);

    let built = build(Runtime::Go, &params).unwrap();
    assert!(built.env.iter().any(|(k, v)| k == "GOPATH" && v == &gopath.display().to_string()));
    assert!(built.env.iter().any(|(k, _)| k == "GOROOT"));
}

#[test]
fn java_build_rejects_insufficient_heap() {
    let revision = revision_key("proj", "default", "v1", "3");
    let app_dir = PathBuf::from("/opt/appscale/apps/proj_default_v1_3/app");
    let pidfile = PathBuf::from("/var/run/aim/app___proj_default_v1_3-8080.pid");
    let web_inf = PathBuf::from("/opt/appscale/apps/proj_default_v1_3/app/war/WEB-INF");
    let env = BTreeMap::new();
    let mut params = base_params(&revision, &app_dir, &pidfile, &env);
    params.max_memory_mb = 200;
    params.web_inf_dir = Some(&web_inf);

    let result = build(Runtime::Java, &params);
    assert!(matches!(result, Err(AimError::BadConfiguration(msg)) if msg.contains("Memory")));
}

#[test]
fn java_build_computes_heap_from_instance_class_memory() {
    let revision = revision_key("proj", "default", "v1", "3");
    let app_dir = PathBuf::from("/opt/appscale/apps/proj_default_v1_3/app");
    let pidfile = PathBuf::from("/var/run/aim/app___proj_default_v1_3-8080.pid");
    let web_inf = PathBuf::from("/opt/appscale/apps/proj_default_v1_3/app/war/WEB-INF");
    let env = BTreeMap::new();
    let mut params = base_params(&revision, &app_dir, &pidfile, &env);
    params.max_memory_mb = 1024;
    params.web_inf_dir = Some(&web_inf);

    let built = build(Runtime::Java, &params).unwrap();
    assert!(built.start_cmd.contains("-Xmx774m"));
    assert!(built.start_cmd.ends_with("/opt/appscale/apps/proj_default_v1_3/app/war"));
}

#[test]
fn java_build_requires_web_inf() {
    let revision = revision_key("proj", "default", "v1", "3");
    let app_dir = PathBuf::from("/opt/appscale/apps/proj_default_v1_3/app");
    let pidfile = PathBuf::from("/var/run/aim/app___proj_default_v1_3-8080.pid");
    let env = BTreeMap::new();
    let params = base_params(&revision, &app_dir, &pidfile, &env);

    let result = build(Runtime::Java, &params);
    assert!(matches!(result, Err(AimError::BadConfiguration(_))));
}
