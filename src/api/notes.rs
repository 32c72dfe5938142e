// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lecture notes endpoints.
//!
//! Students are limited to notes for their own branch and semester (each
//! only when set on the account). There is no update route.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::{syllabus::CourseQuery, ApiJson, ApiPath};
use crate::{
    auth::{Auth, StaffOnly},
    error::ApiError,
    models::{DeleteResponse, NoteCreate},
    state::AppState,
    storage::{
        repository::{NewNote, NoteFilter, NoteRecord},
        NoteRepository,
    },
};

#[utoipa::path(
    get,
    path = "/notes",
    tag = "Notes",
    params(CourseQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, body = [NoteRecord]))
)]
pub async fn list_notes(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<Vec<NoteRecord>>, ApiError> {
    let filter = NoteFilter::scoped_for(
        &user,
        query.branch.as_deref(),
        query.semester.as_deref(),
        query.subject.as_deref(),
    );
    Ok(Json(NoteRepository::new(&state.db).list(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = NoteRecord),
        (status = 404, description = "Note not found or outside the caller's scope")
    )
)]
pub async fn get_note(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<NoteRecord>, ApiError> {
    let note = NoteRepository::new(&state.db)
        .get(id, &NoteFilter::scope_for(&user))
        .await?;
    Ok(Json(note))
}

#[utoipa::path(
    post,
    path = "/notes",
    tag = "Notes",
    request_body = NoteCreate,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = NoteRecord),
        (status = 403, description = "Insufficient role permissions")
    )
)]
pub async fn create_note(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NoteCreate>,
) -> Result<(StatusCode, Json<NoteRecord>), ApiError> {
    request.validate()?;

    let repo = NoteRepository::new(&state.db);
    let id = repo
        .create(&NewNote {
            title: request.title.trim().to_string(),
            subject: request.subject.trim().to_string(),
            branch: request.branch.trim().to_string(),
            semester: request.semester.trim().to_string(),
            scheme: request.scheme,
            file_name: request.file_name,
            file_data: request.file_data,
            file_type: request.file_type,
            uploaded_by: user.id,
        })
        .await?;

    tracing::info!(note_id = id, uploaded_by = %user.id, "Uploaded note");
    let note = repo.get(id, &NoteFilter::default()).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    tag = "Notes",
    params(("id" = i64, Path, description = "Note id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = DeleteResponse),
        (status = 404, description = "Note not found")
    )
)]
pub async fn delete_note(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    NoteRepository::new(&state.db).delete(id).await?;
    tracing::info!(note_id = id, deleted_by = %user.id, "Deleted note");
    Ok(Json(DeleteResponse::for_id(id)))
}
