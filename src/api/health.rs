// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "mitm-eduos-backend";

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
}

/// Database connectivity probe. Failures are reported in the body, not the
/// status code.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DbCheckResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    /// Server time as RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/db-check",
    tag = "Health",
    responses((status = 200, description = "Database probe result", body = DbCheckResponse))
)]
pub async fn db_check(State(state): State<AppState>) -> Json<DbCheckResponse> {
    let response = match state.db.server_time().await {
        Ok(time) => DbCheckResponse {
            ok: true,
            db: Some("connected".to_string()),
            time: Some(time.to_rfc3339()),
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database check failed");
            DbCheckResponse {
                ok: false,
                db: None,
                time: None,
                error: Some(e.to_string()),
            }
        }
    };
    Json(response)
}
