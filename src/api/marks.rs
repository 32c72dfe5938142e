// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Internal assessment marks endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::{ApiJson, ApiPath, StudentRecordQuery};
use crate::{
    auth::{Auth, StaffOnly},
    error::ApiError,
    models::{DeleteResponse, MarksCreate, MarksUpdate},
    state::AppState,
    storage::{
        repository::{non_empty, MarksRecord, NewMarks, StudentRecordFilter},
        MarksRepository, UserRepository,
    },
};

#[utoipa::path(
    get,
    path = "/marks",
    tag = "Marks",
    params(StudentRecordQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, body = [MarksRecord]))
)]
pub async fn list_marks(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(query): Query<StudentRecordQuery>,
) -> Result<Json<Vec<MarksRecord>>, ApiError> {
    let filter = StudentRecordFilter::scoped_for(&user, query.usn.as_deref(), query.subject.as_deref());
    Ok(Json(MarksRepository::new(&state.db).list(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/marks/{id}",
    tag = "Marks",
    params(("id" = i64, Path, description = "Marks record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MarksRecord),
        (status = 403, description = "Record belongs to another student"),
        (status = 404, description = "Marks record not found")
    )
)]
pub async fn get_marks(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MarksRecord>, ApiError> {
    let record = MarksRepository::new(&state.db).get(id).await?;
    if !user.can_view_student_record(&record.usn) {
        return Err(ApiError::forbidden("Not allowed to view this record"));
    }
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/marks",
    tag = "Marks",
    request_body = MarksCreate,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = MarksRecord),
        (status = 404, description = "Student not found")
    )
)]
pub async fn create_marks(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<MarksCreate>,
) -> Result<(StatusCode, Json<MarksRecord>), ApiError> {
    request.validate()?;

    let student_id = UserRepository::new(&state.db)
        .resolve_student_id(&request.usn)
        .await?;

    let repo = MarksRepository::new(&state.db);
    let id = repo
        .create(&NewMarks {
            student_id,
            subject: request.subject.trim().to_string(),
            internal1: request.internal1,
            internal2: request.internal2,
            internal3: request.internal3,
            created_by: user.id,
        })
        .await?;

    tracing::info!(marks_id = id, created_by = %user.id, "Created marks record");
    Ok((StatusCode::CREATED, Json(repo.get(id).await?)))
}

/// Partial update. Omitted internals keep their stored value.
#[utoipa::path(
    put,
    path = "/marks/{id}",
    tag = "Marks",
    params(("id" = i64, Path, description = "Marks record id")),
    request_body = MarksUpdate,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MarksRecord),
        (status = 404, description = "Marks record or student not found")
    )
)]
pub async fn update_marks(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<MarksUpdate>,
) -> Result<Json<MarksRecord>, ApiError> {
    let repo = MarksRepository::new(&state.db);
    let stored = repo.find_stored(id).await?;

    let student_id = match non_empty(update.usn.as_deref()) {
        Some(usn) => Some(UserRepository::new(&state.db).resolve_student_id(&usn).await?),
        None => None,
    };

    repo.update(id, &stored.merge(&update, student_id)).await?;
    tracing::info!(marks_id = id, updated_by = %user.id, "Updated marks record");

    Ok(Json(repo.get(id).await?))
}

#[utoipa::path(
    delete,
    path = "/marks/{id}",
    tag = "Marks",
    params(("id" = i64, Path, description = "Marks record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = DeleteResponse),
        (status = 404, description = "Marks record not found")
    )
)]
pub async fn delete_marks(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    MarksRepository::new(&state.db).delete(id).await?;
    tracing::info!(marks_id = id, deleted_by = %user.id, "Deleted marks record");
    Ok(Json(DeleteResponse::for_id(id)))
}
