// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! immutable [`AppConfig`] built once at startup and shared through
//! [`AppState`](crate::state::AppState).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATABASE_URL` | PostgreSQL connection string | Required |
//! | `DATABASE_MAX_CONNECTIONS` | Connection pool size | `10` |
//! | `JWT_SECRET` | HS256 signing secret for bearer tokens | Required for auth |
//! | `JWT_EXPIRE_MINUTES` | Bearer token lifetime (1 to 525600) | `120` |
//! | `GROQ_API_KEY` | LLM provider API key | Required for `/ai/*` |
//! | `GROQ_MODEL` | LLM model name | `llama-3.3-70b-versatile` |
//! | `GROQ_BASE_URL` | LLM provider base URL | `https://api.groq.com` |
//! | `FRONTEND_ORIGIN` | Extra CORS origins (comma-separated) | empty |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `BODY_LIMIT_MB` | Maximum request body size (inline file payloads) | `50` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug,sqlx=warn` |
//!
//! Empty values are treated the same as unset variables.

use std::{collections::BTreeSet, env, fmt::Display, str::FromStr};

use crate::providers::groq::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// PostgreSQL connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Maximum number of pooled PostgreSQL connections.
pub const DATABASE_MAX_CONNECTIONS_ENV: &str = "DATABASE_MAX_CONNECTIONS";
/// Secret used to sign and verify HS256 bearer tokens.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
/// Bearer token lifetime in minutes.
pub const JWT_EXPIRE_MINUTES_ENV: &str = "JWT_EXPIRE_MINUTES";
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const GROQ_MODEL_ENV: &str = "GROQ_MODEL";
pub const GROQ_BASE_URL_ENV: &str = "GROQ_BASE_URL";
/// Comma-separated list of additional front-end origins allowed by CORS.
pub const FRONTEND_ORIGIN_ENV: &str = "FRONTEND_ORIGIN";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const BODY_LIMIT_MB_ENV: &str = "BODY_LIMIT_MB";
/// Log output format, `json` or `pretty`.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_JWT_EXPIRE_MINUTES: i64 = 120;
/// Longest accepted token lifetime (one year).
pub const MAX_JWT_EXPIRE_MINUTES: i64 = 60 * 24 * 365;
pub const DEFAULT_BODY_LIMIT_MB: usize = 50;

/// Front-end origins that are always allowed, merged with `FRONTEND_ORIGIN`.
pub const DEFAULT_FRONTEND_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} missing in environment")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Settings for the LLM chat-completions provider.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// Allowed cross-origin front-ends.
///
/// Exact matches against the merged origin list, plus any `http(s)` origin on
/// `localhost` or `127.0.0.1` with an optional numeric port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsOrigins {
    origins: Vec<String>,
}

impl CorsOrigins {
    /// Merge the built-in defaults with a raw comma-separated list.
    ///
    /// Entries are trimmed, stripped of surrounding quotes and trailing
    /// slashes; the result is sorted and de-duplicated.
    pub fn from_raw(raw: &str) -> Self {
        let mut merged: BTreeSet<String> = DEFAULT_FRONTEND_ORIGINS
            .iter()
            .map(|origin| origin.to_string())
            .collect();

        for entry in raw.split(',') {
            let normalized = entry
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim_end_matches('/');
            if !normalized.is_empty() {
                merged.insert(normalized.to_string());
            }
        }

        Self {
            origins: merged.into_iter().collect(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.origins
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.origins.iter().any(|allowed| allowed == origin) || is_local_dev_origin(origin)
    }
}

/// Whether `origin` is `http(s)://localhost` or `http(s)://127.0.0.1`,
/// optionally followed by `:<digits>`.
pub fn is_local_dev_origin(origin: &str) -> bool {
    let Some(authority) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };

    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    };

    let host_ok = host == "localhost" || host == "127.0.0.1";
    let port_ok = port.is_none_or(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    host_ok && port_ok
}

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: Option<String>,
    pub jwt_expire_minutes: i64,
    pub groq: GroqConfig,
    pub cors_origins: CorsOrigins,
    pub body_limit_bytes: usize,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let log_format = match value(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: LOG_FORMAT_ENV,
                    reason: format!("expected `json` or `pretty`, got `{other}`"),
                })
            }
        };

        let body_limit_mb: usize = parse_or(value(BODY_LIMIT_MB_ENV), BODY_LIMIT_MB_ENV, DEFAULT_BODY_LIMIT_MB)?;
        let body_limit_bytes = body_limit_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| ConfigError::Invalid {
                key: BODY_LIMIT_MB_ENV,
                reason: format!("{body_limit_mb} MB overflows the byte limit"),
            })?;

        let jwt_expire_minutes: i64 = parse_or(
            value(JWT_EXPIRE_MINUTES_ENV),
            JWT_EXPIRE_MINUTES_ENV,
            DEFAULT_JWT_EXPIRE_MINUTES,
        )?;
        if !(1..=MAX_JWT_EXPIRE_MINUTES).contains(&jwt_expire_minutes) {
            return Err(ConfigError::Invalid {
                key: JWT_EXPIRE_MINUTES_ENV,
                reason: format!("expected 1..={MAX_JWT_EXPIRE_MINUTES}, got {jwt_expire_minutes}"),
            });
        }

        Ok(Self {
            host: value(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(value(PORT_ENV), PORT_ENV, DEFAULT_PORT)?,
            database_url: value(DATABASE_URL_ENV),
            database_max_connections: parse_or(
                value(DATABASE_MAX_CONNECTIONS_ENV),
                DATABASE_MAX_CONNECTIONS_ENV,
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
            jwt_secret: value(JWT_SECRET_ENV),
            jwt_expire_minutes,
            groq: GroqConfig {
                api_key: value(GROQ_API_KEY_ENV),
                model: value(GROQ_MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: value(GROQ_BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
            cors_origins: CorsOrigins::from_raw(&value(FRONTEND_ORIGIN_ENV).unwrap_or_default()),
            body_limit_bytes,
            log_format,
        })
    }

    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing(DATABASE_URL_ENV))
    }

    pub fn require_jwt_secret(&self) -> Result<&str, ConfigError> {
        self.jwt_secret
            .as_deref()
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.jwt_expire_minutes, 120);
        assert_eq!(config.groq.model, "llama-3.3-70b-versatile");
        assert_eq!(config.groq.base_url, "https://api.groq.com");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.jwt_secret.is_none());
        assert!(config.groq.api_key.is_none());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let config = config_from(&[("JWT_SECRET", "   "), ("GROQ_MODEL", "")]).unwrap();
        assert!(matches!(
            config.require_jwt_secret(),
            Err(ConfigError::Missing("JWT_SECRET"))
        ));
        assert_eq!(config.groq.model, DEFAULT_MODEL);
        assert!(matches!(
            config.require_database_url(),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = config_from(&[("JWT_EXPIRE_MINUTES", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "JWT_EXPIRE_MINUTES",
                ..
            }
        ));
    }

    #[test]
    fn token_lifetime_must_be_positive_and_bounded() {
        for raw in ["0", "-5", "9223372036854775807", "525601"] {
            let err = config_from(&[("JWT_EXPIRE_MINUTES", raw)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: "JWT_EXPIRE_MINUTES", .. }),
                "{raw} should be rejected"
            );
        }

        let config = config_from(&[("JWT_EXPIRE_MINUTES", "525600")]).unwrap();
        assert_eq!(config.jwt_expire_minutes, MAX_JWT_EXPIRE_MINUTES);
    }

    #[test]
    fn body_limit_overflow_is_rejected() {
        let huge = usize::MAX.to_string();
        let err = config_from(&[("BODY_LIMIT_MB", huge.as_str())]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BODY_LIMIT_MB", .. }));

        let config = config_from(&[("BODY_LIMIT_MB", "2")]).unwrap();
        assert_eq!(config.body_limit_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn frontend_origins_are_normalized_and_merged() {
        let origins = CorsOrigins::from_raw(" \"https://eduos.example.com/\" ,'http://localhost:3000',, ");
        let list = origins.as_slice();
        assert!(list.contains(&"https://eduos.example.com".to_string()));
        assert_eq!(
            list.iter().filter(|o| *o == "http://localhost:3000").count(),
            1
        );
        assert_eq!(list.len(), DEFAULT_FRONTEND_ORIGINS.len() + 1);
        let mut sorted = list.to_vec();
        sorted.sort();
        assert_eq!(sorted, list);
    }

    #[test]
    fn local_dev_origins_match_any_port() {
        assert!(is_local_dev_origin("http://localhost"));
        assert!(is_local_dev_origin("http://localhost:4200"));
        assert!(is_local_dev_origin("https://127.0.0.1:8443"));
        assert!(!is_local_dev_origin("http://localhost:"));
        assert!(!is_local_dev_origin("http://localhost:80/path"));
        assert!(!is_local_dev_origin("http://localhost.evil.com"));
        assert!(!is_local_dev_origin("ftp://localhost"));
    }

    #[test]
    fn cors_allows_configured_and_local_origins() {
        let origins = CorsOrigins::from_raw("https://eduos.example.com");
        assert!(origins.allows("https://eduos.example.com"));
        assert!(origins.allows("http://127.0.0.1:9999"));
        assert!(!origins.allows("https://other.example.com"));
    }
}
