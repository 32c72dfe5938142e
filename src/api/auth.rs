// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: registration, login, demo seeding and identity.

use axum::{extract::State, http::StatusCode, Json};

use super::ApiJson;
use crate::{
    auth::{
        password::{hash_password_blocking, verify_password_blocking},
        Auth, AuthError, AuthenticatedUser, TokenKeys,
    },
    error::ApiError,
    models::{LoginRequest, RegisterRequest, SeedSummary, TokenResponse},
    state::AppState,
    storage::{
        repository::NewUser,
        seed::{seed_default_users, seed_summary},
        UserRepository,
    },
};

/// Create an account.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthenticatedUser),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "login_id already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthenticatedUser>), ApiError> {
    request.validate()?;

    let new_user = NewUser {
        login_id: request.login_id.trim().to_string(),
        full_name: request.full_name.trim().to_string(),
        role: request.role,
        password_hash: hash_password_blocking(request.password).await?,
        branch: request.branch,
        semester: request.semester,
    };

    let user = UserRepository::new(&state.db).create(&new_user).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "Registered user");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    request.validate()?;

    let credentials = UserRepository::new(&state.db)
        .find_credentials(request.login_id.trim())
        .await?;

    let Some((user, hash)) = credentials else {
        return Err(AuthError::InvalidCredentials.into());
    };
    if !verify_password_blocking(request.password, hash).await? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = TokenKeys::from_config(&state.config)?.issue(&user)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse::bearer(token, user)))
}

/// Reset the demo faculty and student accounts.
#[utoipa::path(
    post,
    path = "/auth/seed-users",
    tag = "Auth",
    responses((status = 200, description = "Seed accounts written", body = SeedSummary))
)]
pub async fn seed_users(State(state): State<AppState>) -> Result<Json<SeedSummary>, ApiError> {
    seed_default_users(&state.db).await?;
    Ok(Json(seed_summary()))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = AuthenticatedUser),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(Auth(user): Auth) -> Json<AuthenticatedUser> {
    Json(user)
}
