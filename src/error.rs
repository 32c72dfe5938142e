// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    auth::{password::PasswordError, AuthError},
    config::ConfigError,
    providers::groq::GroqError,
    storage::{seed::SeedError, StorageError},
};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    /// Required configuration (secret, URL, API key) is missing.
    pub fn internal_configuration(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            detail: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(message) => Self::not_found(message),
            StorageError::Conflict(message) => Self::conflict(message),
            StorageError::InvalidRow(message) => {
                tracing::error!(error = %message, "Stored row failed validation");
                Self::internal("Stored record is invalid")
            }
            StorageError::Database(e) => {
                tracing::error!(error = %e, "Database operation failed");
                Self::internal("Database error")
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        Self::internal_configuration(err.to_string())
    }
}

impl From<GroqError> for ApiError {
    fn from(err: GroqError) -> Self {
        match err {
            GroqError::MissingApiKey => Self::internal_configuration(err.to_string()),
            other => {
                tracing::warn!(error = %other, "LLM provider call failed");
                Self::bad_gateway(other.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.status_code(), err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        tracing::error!(error = %err, "Password hashing failed");
        Self::internal("Failed to hash password")
    }
}

impl From<SeedError> for ApiError {
    fn from(err: SeedError) -> Self {
        match err {
            SeedError::Password(e) => e.into(),
            SeedError::Storage(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::invalid_input("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let conflict = ApiError::conflict("dup");
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let gateway = ApiError::bad_gateway("upstream");
        assert_eq!(gateway.status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn into_response_returns_detail_body() {
        let response = ApiError::invalid_input("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"detail":"bad data"}"#);
    }

    #[test]
    fn storage_errors_map_to_statuses() {
        let nf: ApiError = StorageError::NotFound("Marks record not found".into()).into();
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "Marks record not found");

        let conflict: ApiError = StorageError::Conflict("login_id already exists".into()).into();
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let db: ApiError = StorageError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(db.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(db.message, "Database error");
    }

    #[test]
    fn missing_configuration_is_internal() {
        let err: ApiError = ConfigError::Missing("JWT_SECRET").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("JWT_SECRET"));

        let err: ApiError = GroqError::MissingApiKey.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn seed_failures_keep_their_source_status() {
        let err: ApiError = SeedError::Password(PasswordError::RandomUnavailable).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to hash password");

        let err: ApiError = SeedError::Storage(StorageError::Conflict("dup".into())).into();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn provider_failures_are_bad_gateway() {
        let err: ApiError = GroqError::CredentialsRejected.into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }
}
