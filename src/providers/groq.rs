// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Groq chat-completions client (OpenAI-compatible API).

use std::time::Duration;

use reqwest::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::config::GroqConfig;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com";

const COMPLETIONS_PATH: &str = "openai/v1/chat/completions";
const USER_AGENT: &str = "MITM-EduOs/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
const TEMPERATURE: f64 = 0.3;
const ERROR_EXCERPT_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GroqError {
    #[error("GROQ_API_KEY missing in environment")]
    MissingApiKey,

    #[error("GROQ_BASE_URL is invalid: {0}")]
    InvalidBaseUrl(String),

    #[error(
        "Groq access denied by upstream firewall (Cloudflare 1010). Turn off VPN/proxy, \
         try a different network, and rotate GROQ_API_KEY."
    )]
    FirewallBlocked,

    #[error("Groq rejected credentials. Verify GROQ_API_KEY and generate a new key if needed.")]
    CredentialsRejected,

    #[error("Groq HTTP error: {excerpt}")]
    Http { status: u16, excerpt: String },

    #[error("Groq connection error: {0}")]
    Connection(String),

    #[error("Groq unexpected error: {0}")]
    InvalidResponse(String),
}

/// Map a non-success response to the matching error.
pub fn classify_http_failure(status: StatusCode, body: &str) -> GroqError {
    let lowered = body.to_lowercase();
    if lowered.contains("error code: 1010") || lowered.contains("access denied") {
        return GroqError::FirewallBlocked;
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return GroqError::CredentialsRejected;
    }
    GroqError::Http {
        status: status.as_u16(),
        excerpt: body.chars().take(ERROR_EXCERPT_CHARS).collect(),
    }
}

/// `choices[0].message.content`, trimmed; empty when absent.
pub fn extract_completion_text(response: &Value) -> String {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct GroqClient {
    api_key: Option<String>,
    model: String,
    endpoint: Url,
    http: Client,
}

impl GroqClient {
    pub fn new(config: &GroqConfig) -> Result<Self, GroqError> {
        let endpoint = completions_url(&config.base_url)?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GroqError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint,
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run one non-streaming completion. No retries.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        max_completion_tokens: u32,
    ) -> Result<String, GroqError> {
        let api_key = self.api_key.as_deref().ok_or(GroqError::MissingApiKey)?;

        let payload = json!({
            "model": self.model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_completion_tokens": max_completion_tokens,
            "stream": false,
        });

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            max_completion_tokens,
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| GroqError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GroqError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_http_failure(status, &body));
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| GroqError::InvalidResponse(e.to_string()))?;
        Ok(extract_completion_text(&value))
    }
}

fn completions_url(base_url: &str) -> Result<Url, GroqError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let base = Url::parse(&format!("{trimmed}/"))
        .map_err(|e| GroqError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(GroqError::InvalidBaseUrl(format!(
            "{base_url}: unsupported scheme"
        )));
    }
    base.join(COMPLETIONS_PATH)
        .map_err(|e| GroqError::InvalidBaseUrl(format!("{base_url}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, base_url: &str) -> GroqConfig {
        GroqConfig {
            api_key: api_key.map(str::to_string),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.to_string(),
        }
    }

    #[test]
    fn firewall_block_wins_over_status() {
        let err = classify_http_failure(StatusCode::FORBIDDEN, "error code: 1010");
        assert!(matches!(err, GroqError::FirewallBlocked));

        let err = classify_http_failure(StatusCode::BAD_REQUEST, "<h1>Access Denied</h1>");
        assert!(matches!(err, GroqError::FirewallBlocked));
    }

    #[test]
    fn auth_statuses_are_credentials_rejected() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = classify_http_failure(status, r#"{"error":"invalid_api_key"}"#);
            assert!(matches!(err, GroqError::CredentialsRejected));
        }
    }

    #[test]
    fn other_errors_keep_a_bounded_excerpt() {
        let body = "x".repeat(800);
        let err = classify_http_failure(StatusCode::INTERNAL_SERVER_ERROR, &body);
        match &err {
            GroqError::Http { status, excerpt } => {
                assert_eq!(*status, 500);
                assert_eq!(excerpt.len(), 500);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("Groq HTTP error: xxx"));
    }

    #[test]
    fn completion_text_is_trimmed() {
        let response = json!({"choices": [{"message": {"content": "  ### Plan\n"}}]});
        assert_eq!(extract_completion_text(&response), "### Plan");
    }

    #[test]
    fn missing_completion_text_is_empty() {
        assert_eq!(extract_completion_text(&json!({})), "");
        assert_eq!(extract_completion_text(&json!({"choices": []})), "");
        assert_eq!(
            extract_completion_text(&json!({"choices": [{"message": {"content": null}}]})),
            ""
        );
    }

    #[test]
    fn endpoint_is_joined_onto_base_url() {
        let client = GroqClient::new(&config(None, "https://api.groq.com/")).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://api.groq.com/openai/v1/chat/completions"
        );

        let client = GroqClient::new(&config(None, "http://localhost:9000/proxy")).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://localhost:9000/proxy/openai/v1/chat/completions"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            GroqClient::new(&config(None, "not a url")),
            Err(GroqError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            GroqClient::new(&config(None, "ftp://api.groq.com")),
            Err(GroqError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let client = GroqClient::new(&config(None, DEFAULT_BASE_URL)).unwrap();
        let result = client.complete(&[ChatMessage::user("hi")], 16).await;
        assert!(matches!(result, Err(GroqError::MissingApiKey)));
    }

    #[test]
    fn messages_serialize_with_lowercase_roles() {
        let json = serde_json::to_value(ChatMessage::system("rules")).unwrap();
        assert_eq!(json, json!({"role": "system", "content": "rules"}));
    }
}
