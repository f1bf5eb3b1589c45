// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! The three-verb, two-route HTTP surface that drives the lifecycle engine.
//!
//! All request and response bodies are JSON except error responses, which
//! are plain text carrying the status code from [`aim_core::AimError::status_code`].

use std::sync::Arc;

use aim_core::{AimError, VersionKey};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, warn};

use aim_engine::LifecycleEngine;

pub fn router(engine: Arc<LifecycleEngine>) -> Router {
    Router::new()
        .route("/versions/{version_key}", post(start_version).delete(stop_all))
        .route("/versions/{version_key}/{port}", delete(stop_one))
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
struct StartRequest {
    app_port: u16,
    login_server: String,
}

/// A request-scoped wrapper so the handler boundary, not the engine, owns
/// the translation from an [`AimError`] to an HTTP response.
struct ApiError(AimError);

impl From<AimError> for ApiError {
    fn from(err: AimError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(err = %self.0, "request failed");
        } else {
            warn!(err = %self.0, "request rejected");
        }
        (status, self.0.to_string()).into_response()
    }
}

fn parse_version_key(raw: &str) -> Result<VersionKey, ApiError> {
    VersionKey::parse(raw).map_err(ApiError::from)
}

async fn start_version(
    State(engine): State<Arc<LifecycleEngine>>,
    Path(version_key): Path<String>,
    Json(body): Json<StartRequest>,
) -> Result<StatusCode, ApiError> {
    let version_key = parse_version_key(&version_key)?;
    engine.start(&version_key, body.app_port, body.login_server).await?;
    Ok(StatusCode::OK)
}

async fn stop_all(
    State(engine): State<Arc<LifecycleEngine>>,
    Path(version_key): Path<String>,
) -> Result<StatusCode, ApiError> {
    let version_key = parse_version_key(&version_key)?;
    engine.stop_all(&version_key).await?;
    Ok(StatusCode::OK)
}

async fn stop_one(
    State(engine): State<Arc<LifecycleEngine>>,
    Path((version_key, port)): Path<(String, u16)>,
) -> Result<StatusCode, ApiError> {
    let version_key = parse_version_key(&version_key)?;
    engine.stop_one(&version_key, port).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
