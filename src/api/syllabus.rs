// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Syllabus endpoints. Readable by every authenticated user.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{ApiJson, ApiPath};
use crate::{
    auth::{Auth, StaffOnly},
    error::ApiError,
    models::{DeleteResponse, SyllabusCreate, SyllabusUpdate},
    state::AppState,
    storage::{
        repository::{NewSyllabus, SyllabusFilter, SyllabusRecord},
        SyllabusRepository,
    },
};

/// Exact-match filters; empty values are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CourseQuery {
    pub branch: Option<String>,
    pub semester: Option<String>,
    pub subject: Option<String>,
}

#[utoipa::path(
    get,
    path = "/syllabus",
    tag = "Syllabus",
    params(CourseQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, body = [SyllabusRecord]))
)]
pub async fn list_syllabus(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<Vec<SyllabusRecord>>, ApiError> {
    let filter = SyllabusFilter::new(
        query.branch.as_deref(),
        query.semester.as_deref(),
        query.subject.as_deref(),
    );
    Ok(Json(SyllabusRepository::new(&state.db).list(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/syllabus/{id}",
    tag = "Syllabus",
    params(("id" = i64, Path, description = "Syllabus record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = SyllabusRecord),
        (status = 404, description = "Syllabus record not found")
    )
)]
pub async fn get_syllabus(
    Auth(_user): Auth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<SyllabusRecord>, ApiError> {
    Ok(Json(SyllabusRepository::new(&state.db).get(id).await?))
}

#[utoipa::path(
    post,
    path = "/syllabus",
    tag = "Syllabus",
    request_body = SyllabusCreate,
    security(("bearer_auth" = [])),
    responses((status = 201, body = SyllabusRecord))
)]
pub async fn create_syllabus(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SyllabusCreate>,
) -> Result<(StatusCode, Json<SyllabusRecord>), ApiError> {
    request.validate()?;

    let repo = SyllabusRepository::new(&state.db);
    let id = repo
        .create(&NewSyllabus {
            branch: request.branch,
            semester: request.semester,
            subject: request.subject,
            subject_code: request.subject_code,
            content: request.content,
            file_name: request.file_name,
            file_data: request.file_data,
            file_type: request.file_type,
            created_by: user.id,
        })
        .await?;

    tracing::info!(syllabus_id = id, created_by = %user.id, "Created syllabus record");
    Ok((StatusCode::CREATED, Json(repo.get(id).await?)))
}

#[utoipa::path(
    put,
    path = "/syllabus/{id}",
    tag = "Syllabus",
    params(("id" = i64, Path, description = "Syllabus record id")),
    request_body = SyllabusUpdate,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = SyllabusRecord),
        (status = 404, description = "Syllabus record not found")
    )
)]
pub async fn update_syllabus(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<SyllabusUpdate>,
) -> Result<Json<SyllabusRecord>, ApiError> {
    let repo = SyllabusRepository::new(&state.db);
    let merged = repo.get(id).await?.merge(&update);
    repo.update(id, &merged).await?;
    tracing::info!(syllabus_id = id, updated_by = %user.id, "Updated syllabus record");

    Ok(Json(repo.get(id).await?))
}

#[utoipa::path(
    delete,
    path = "/syllabus/{id}",
    tag = "Syllabus",
    params(("id" = i64, Path, description = "Syllabus record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = DeleteResponse),
        (status = 404, description = "Syllabus record not found")
    )
)]
pub async fn delete_syllabus(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    SyllabusRepository::new(&state.db).delete(id).await?;
    tracing::info!(syllabus_id = id, deleted_by = %user.id, "Deleted syllabus record");
    Ok(Json(DeleteResponse::for_id(id)))
}
