// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser, freshly read from the users table
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use super::{require_roles, tokens::TokenKeys, AuthError, AuthenticatedUser, Role};
use crate::{state::AppState, storage::repository::UserRepository};

/// Extractor for authenticated users.
///
/// Validates the bearer token and re-reads the user it names. Only the
/// token subject is trusted; role, branch and semester come from storage.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = bearer_token(auth_header).ok_or(AuthError::InvalidAuthHeader)?;

        let keys = TokenKeys::from_config(&state.config)?;
        let claims = keys.verify(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidTokenPayload)?;

        let user = UserRepository::new(&state.db)
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::InternalError(format!("Failed to load user: {e}")))?
            .ok_or(AuthError::UserNotFound)?;

        Ok(Auth(user))
    }
}

/// Extractor that requires the faculty or HOD role.
pub struct StaffOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for StaffOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;
        require_roles(&user, &Role::STAFF)?;
        Ok(StaffOnly(user))
    }
}

/// Split `Bearer <token>`; the scheme is matched case-insensitively.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::TokenClaims, state::test_state};
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/auth/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn user_with(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            login_id: "4MH23IS001".to_string(),
            full_name: "Student 01".to_string(),
            role,
            branch: None,
            semester: None,
        }
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = test_state();
        let mut parts = parts_with(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_other_schemes() {
        let state = test_state();
        let mut parts = parts_with(Some("Basic dXNlcjpwYXNz"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_garbage_token() {
        let state = test_state();
        let mut parts = parts_with(Some("Bearer not.a.token"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_non_uuid_subject() {
        let state = test_state();
        let claims = TokenClaims {
            sub: "not-a-uuid".to_string(),
            role: Role::Student,
            login_id: "4MH23IS001".to_string(),
            iat: chrono::Utc::now().timestamp(),
            exp: chrono::Utc::now().timestamp() + 600,
        };
        let token = TokenKeys::from_config(&state.config)
            .unwrap()
            .sign(&claims)
            .unwrap();
        let mut parts = parts_with(Some(&format!("Bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidTokenPayload)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let state = test_state();
        let mut parts = parts_with(None);
        parts.extensions.insert(user_with(Role::Faculty));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.role, Role::Faculty);
    }

    #[tokio::test]
    async fn staff_only_rejects_students() {
        let state = test_state();
        let mut parts = parts_with(None);
        parts.extensions.insert(user_with(Role::Student));

        let result = StaffOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn staff_only_accepts_hod() {
        let state = test_state();
        let mut parts = parts_with(None);
        parts.extensions.insert(user_with(Role::Hod));

        let StaffOnly(user) = StaffOnly::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.role, Role::Hod);
    }
}
