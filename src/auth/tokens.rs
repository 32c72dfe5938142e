// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 bearer token issue and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{claims::TokenClaims, AuthError, AuthenticatedUser};
use crate::config::{AppConfig, MAX_JWT_EXPIRE_MINUTES};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Signing material derived from `JWT_SECRET`.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenKeys {
    /// `lifetime_minutes` is clamped to `1..=MAX_JWT_EXPIRE_MINUTES`.
    pub fn new(secret: &str, lifetime_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::minutes(lifetime_minutes.clamp(1, MAX_JWT_EXPIRE_MINUTES)),
        }
    }

    /// Build keys from configuration; a missing secret is an internal error.
    pub fn from_config(config: &AppConfig) -> Result<Self, AuthError> {
        let secret = config
            .require_jwt_secret()
            .map_err(|e| AuthError::InternalError(e.to_string()))?;
        Ok(Self::new(secret, config.jwt_expire_minutes))
    }

    pub fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &AuthenticatedUser, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims {
            sub: user.id.to_string(),
            role: user.role,
            login_id: user.login_id.clone(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(format!("Failed to sign token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;

        decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    const FACULTY_ID: &str = "5b0d7c1e-6f7a-4b8e-9d1c-2a3b4c5d6e7f";

    fn faculty() -> AuthenticatedUser {
        AuthenticatedUser {
            id: uuid::Uuid::parse_str(FACULTY_ID).unwrap(),
            login_id: "FCLT001".to_string(),
            full_name: "Faculty One".to_string(),
            role: Role::Faculty,
            branch: None,
            semester: None,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let keys = TokenKeys::new("test-secret", 120);
        let token = keys.issue(&faculty()).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, FACULTY_ID);
        assert_eq!(claims.role, Role::Faculty);
        assert_eq!(claims.login_id, "FCLT001");
        assert_eq!(claims.exp - claims.iat, 120 * 60);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenKeys::new("secret-a", 120).issue(&faculty()).unwrap();
        let result = TokenKeys::new("secret-b", 120).verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new("test-secret", 120);
        let issued = Utc::now() - Duration::hours(3);
        let token = keys.issue_at(&faculty(), issued).unwrap();
        assert!(matches!(keys.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn expiry_within_leeway_is_accepted() {
        let keys = TokenKeys::new("test-secret", 120);
        let issued = Utc::now() - Duration::minutes(120) + Duration::seconds(-30);
        let token = keys.issue_at(&faculty(), issued).unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn garbage_is_malformed() {
        let keys = TokenKeys::new("test-secret", 120);
        assert!(matches!(keys.verify("not-a-token"), Err(AuthError::MalformedToken)));
    }

    #[test]
    fn out_of_range_lifetime_is_clamped() {
        let keys = TokenKeys::new("test-secret", i64::MAX);
        let claims = keys.verify(&keys.issue(&faculty()).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_JWT_EXPIRE_MINUTES * 60);
    }

    #[test]
    fn missing_secret_is_internal_error() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let result = TokenKeys::from_config(&config);
        assert!(matches!(result, Err(AuthError::InternalError(_))));
    }
}
