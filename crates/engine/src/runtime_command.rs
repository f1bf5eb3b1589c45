// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Builds the runtime-specific start command and environment for a watch.
//!
//! `python27`, `go`, and `php` share the Python dev-appserver front-end;
//! `java` uses a distinct front-end with its own heap accounting. Dispatch
//! is static: each `Runtime` variant maps to a zero-sized `CommandBuilder`
//! impl rather than a branch embedded in the caller.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use aim_core::{AimError, RevisionKey, Runtime};

const DEV_APPSERVER_PATH: &str = "/opt/appscale/AppServer/dev_appserver.py";
const JAVA_DEV_APPSERVER_SH: &str = "/opt/appscale/AppServer_Java/appengine-java-sdk-repacked/bin/dev_appserver.sh";
const GO_SDK_ROOT: &str = "/opt/appscale/AppServer_Java/gosdk/goroot";
const PHP_CGI_LOCATION: &str = "/usr/bin/php-cgi";
const UA_SERVER_PORT: u16 = 4343;
const DB_SERVER_PORT: u16 = 8888;
const TRUSTED_FLAG: &str = "--trusted";

/// Parameters shared by every runtime's command builder.
pub struct CommandParams<'a> {
    pub project_id: &'a str,
    pub revision_key: &'a RevisionKey,
    pub port: u16,
    pub api_server_port: u16,
    pub login_server: &'a str,
    pub private_ip: &'a str,
    pub db_proxy: &'a str,
    pub tq_proxy: &'a str,
    pub pidfile: &'a Path,
    pub app_dir: &'a Path,
    pub gopath_dir: Option<&'a Path>,
    pub web_inf_dir: Option<&'a Path>,
    pub max_memory_mb: u32,
    pub env_variables: &'a BTreeMap<String, String>,
    pub trusted: bool,
}

/// The materialized command line and environment for a watch.
pub struct ProcessCommand {
    pub start_cmd: String,
    pub env: Vec<(String, String)>,
}

trait CommandBuilder {
    fn build(&self, params: &CommandParams<'_>) -> Result<ProcessCommand, AimError>;
}

struct PythonFrontEndBuilder;
struct JavaFrontEndBuilder;

fn command_builder(runtime: &Runtime) -> &'static dyn CommandBuilder {
    static PYTHON: PythonFrontEndBuilder = PythonFrontEndBuilder;
    static JAVA: JavaFrontEndBuilder = JavaFrontEndBuilder;
    match runtime {
        Runtime::Python27 | Runtime::Go | Runtime::Php => &PYTHON,
        Runtime::Java => &JAVA,
    }
}

/// Builds the start command and environment for `runtime`, per
/// [`command_builder`].
pub fn build(runtime: Runtime, params: &CommandParams<'_>) -> Result<ProcessCommand, AimError> {
    command_builder(&runtime).build(params)
}

impl CommandBuilder for PythonFrontEndBuilder {
    fn build(&self, params: &CommandParams<'_>) -> Result<ProcessCommand, AimError> {
        let mut env: Vec<(String, String)> = params.env_variables.iter().map(|(k, v)| (k.clone(), v.clone())).collect();

        let mut cmd = vec![
            "/usr/bin/python2".to_string(),
            DEV_APPSERVER_PATH.to_string(),
            "--application".to_string(),
            params.project_id.to_string(),
            format!("--port {}", params.port),
            format!("--admin_port {}", params.port as u32 + 10000),
            format!("--login_server {}", params.login_server),
            "--skip_sdk_update_check".to_string(),
            format!("--nginx_host {}", params.login_server),
            "--require_indexes".to_string(),
            "--enable_sendmail".to_string(),
            format!("--xmpp_path {}", params.login_server),
            format!("--php_executable_path={PHP_CGI_LOCATION}"),
            format!("--uaserver_path {}:{UA_SERVER_PORT}", params.db_proxy),
            format!("--datastore_path {}:{DB_SERVER_PORT}", params.db_proxy),
            params.app_dir.display().to_string(),
            format!("--host {}", params.private_ip),
            format!("--admin_host {}", params.private_ip),
            "--automatic_restart".to_string(),
            "no".to_string(),
            "--pidfile".to_string(),
            params.pidfile.display().to_string(),
            "--external_api_port".to_string(),
            params.api_server_port.to_string(),
        ];
        if params.trusted {
            cmd.push(TRUSTED_FLAG.to_string());
        }

        if let Some(gopath) = params.gopath_dir {
            env.push(("GOPATH".to_string(), gopath.display().to_string()));
            env.push(("GOROOT".to_string(), PathBuf::from(GO_SDK_ROOT).display().to_string()));
        }

        Ok(ProcessCommand { start_cmd: cmd.join(" "), env })
    }
}

impl CommandBuilder for JavaFrontEndBuilder {
    fn build(&self, params: &CommandParams<'_>) -> Result<ProcessCommand, AimError> {
        const FIXED_OVERHEAD_MB: u32 = 250;
        let max_heap = params
            .max_memory_mb
            .checked_sub(FIXED_OVERHEAD_MB)
            .filter(|heap| *heap > 0)
            .ok_or_else(|| AimError::BadConfiguration("Memory for Java applications must be greater than 250MB".into()))?;

        let web_inf_parent = params
            .web_inf_dir
            .and_then(Path::parent)
            .ok_or_else(|| AimError::BadConfiguration("no WEB-INF directory found in application source".into()))?;

        let cmd = vec![
            JAVA_DEV_APPSERVER_SH.to_string(),
            format!("--port={}", params.port),
            "--jvm_flag=-Dsocket.permit_connect=true".to_string(),
            format!("--jvm_flag=-Xmx{max_heap}m"),
            "--jvm_flag=-Djava.security.egd=file:/dev/./urandom".to_string(),
            "--jvm_flag=-Djdk.tls.client.protocols=TLSv1.1,TLSv1.2".to_string(),
            "--disable_update_check".to_string(),
            format!("--address={}", params.private_ip),
            format!("--datastore_path={}", params.db_proxy),
            format!("--login_server={}", params.login_server),
            "--appscale_version=1".to_string(),
            format!("--APP_NAME={}", params.project_id),
            format!("--NGINX_ADDRESS={}", params.login_server),
            format!("--TQ_PROXY={}", params.tq_proxy),
            format!("--pidfile={}", params.pidfile.display()),
            format!("--external_api_port={}", params.api_server_port),
            "--api_using_python_stub=app_identity_service".to_string(),
            web_inf_parent.display().to_string(),
        ];

        let mut env: Vec<(String, String)> = params.env_variables.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        env.push(("GCS_HOST".to_string(), "https://storage.googleapis.com:443".to_string()));

        Ok(ProcessCommand { start_cmd: cmd.join(" "), env })
    }
}

#[cfg(test)]
#[path = "runtime_command_tests.rs"]
mod tests;
