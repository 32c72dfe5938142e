// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Every token problem maps to 401 with the same detail text; `error_code`
/// carries the precise reason.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Missing bearer token")]
    MissingAuthHeader,
    /// Authorization header is not `Bearer <token>`
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Token could not be decoded
    #[error("Invalid or expired token")]
    MalformedToken,
    /// Token signature does not match the configured secret
    #[error("Invalid or expired token")]
    InvalidSignature,
    /// Token has expired
    #[error("Invalid or expired token")]
    TokenExpired,
    /// Token decoded but its subject is unusable
    #[error("Invalid token payload")]
    InvalidTokenPayload,
    /// Token subject no longer resolves to a stored user
    #[error("User not found")]
    UserNotFound,
    /// Login id / password pair did not match
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Authenticated, but role is not allowed
    #[error("Insufficient role permissions")]
    InsufficientPermissions,
    /// Internal error (missing secret, storage failure)
    #[error("{0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    detail: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidTokenPayload => "invalid_token_payload",
            AuthError::UserNotFound => "user_not_found",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidTokenPayload
            | AuthError::UserNotFound
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let AuthError::InternalError(reason) = &self {
            tracing::error!(error = %reason, "Authentication failed internally");
        }
        let body = Json(AuthErrorBody {
            detail: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
