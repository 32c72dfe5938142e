// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LLM-backed endpoints. Each request is a single non-streaming completion.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::ApiJson;
use crate::{
    ai::{
        self, build_reference_context, ensure_diagram,
        prompt::{
            append_reference_context, build_prompt, chat_system_prompt, normalize_history,
            notes_lookup_prompt, syllabus_lookup_prompt,
        },
        AiTask, SearchState,
    },
    auth::{Auth, StaffOnly},
    error::ApiError,
    providers::ChatMessage,
    state::AppState,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AiTaskRequest {
    pub task: AiTask,
    pub search: SearchState,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AiChatRequest {
    pub message: String,
    /// Prior turns as `{role, content}` or `{role, parts: [{text}]}`.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<Value>,
    pub search: SearchState,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AiTextResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AiTextWithLinks {
    pub text: String,
    /// Always empty; kept for client compatibility.
    pub links: Vec<String>,
}

fn or_fallback(text: String, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[utoipa::path(
    post,
    path = "/ai/syllabus",
    tag = "AI",
    request_body = SearchState,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = AiTextWithLinks),
        (status = 502, description = "LLM provider error")
    )
)]
pub async fn syllabus_lookup(
    Auth(_user): Auth,
    State(state): State<AppState>,
    ApiJson(search): ApiJson<SearchState>,
) -> Result<Json<AiTextWithLinks>, ApiError> {
    let prompt = syllabus_lookup_prompt(&search);
    let text = state
        .llm
        .complete(&[ChatMessage::user(prompt)], ai::CHAT_MAX_TOKENS)
        .await?;

    Ok(Json(AiTextWithLinks {
        text: or_fallback(text, ai::SYLLABUS_FALLBACK),
        links: Vec::new(),
    }))
}

#[utoipa::path(
    post,
    path = "/ai/notes",
    tag = "AI",
    request_body = SearchState,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = AiTextWithLinks),
        (status = 502, description = "LLM provider error")
    )
)]
pub async fn notes_lookup(
    Auth(_user): Auth,
    State(state): State<AppState>,
    ApiJson(search): ApiJson<SearchState>,
) -> Result<Json<AiTextWithLinks>, ApiError> {
    let prompt = notes_lookup_prompt(&search);
    let text = state
        .llm
        .complete(&[ChatMessage::user(prompt)], ai::CHAT_MAX_TOKENS)
        .await?;

    Ok(Json(AiTextWithLinks {
        text: or_fallback(text, ai::NOTES_FALLBACK),
        links: Vec::new(),
    }))
}

/// Generate a lesson plan, question paper, quiz or document analysis.
///
/// Question papers are grounded in the stored syllabus and notes for the
/// requested branch and semester, and always come back with a diagram.
#[utoipa::path(
    post,
    path = "/ai/task",
    tag = "AI",
    request_body = AiTaskRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = AiTextResponse),
        (status = 403, description = "Insufficient role permissions"),
        (status = 502, description = "LLM provider error")
    )
)]
pub async fn run_task(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AiTaskRequest>,
) -> Result<Json<AiTextResponse>, ApiError> {
    let AiTaskRequest { task, search } = request;
    let mut prompt = build_prompt(task, &search);
    if task == AiTask::Qp {
        let context = build_reference_context(&state.db, &search).await;
        append_reference_context(&mut prompt, &context);
    }

    tracing::info!(user_id = %user.id, ?task, "Running AI task");
    let mut text = state
        .llm
        .complete(&[ChatMessage::user(prompt)], ai::TASK_MAX_TOKENS)
        .await?;
    if task == AiTask::Qp {
        text = ensure_diagram(&text, &search.subject);
    }

    Ok(Json(AiTextResponse {
        text: or_fallback(text, ai::TASK_FALLBACK),
    }))
}

#[utoipa::path(
    post,
    path = "/ai/chat",
    tag = "AI",
    request_body = AiChatRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = AiTextResponse),
        (status = 502, description = "LLM provider error")
    )
)]
pub async fn chat(
    Auth(_user): Auth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AiChatRequest>,
) -> Result<Json<AiTextResponse>, ApiError> {
    let mut messages = vec![ChatMessage::system(chat_system_prompt(&request.search))];
    messages.extend(normalize_history(&request.history));
    messages.push(ChatMessage::user(request.message));

    let text = state.llm.complete(&messages, ai::CHAT_MAX_TOKENS).await?;
    Ok(Json(AiTextResponse {
        text: or_fallback(text, ai::CHAT_FALLBACK),
    }))
}
