// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Attendance endpoints.
//!
//! Students only ever see their own rows; faculty and HODs may read
//! everything and are the only roles allowed to write.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::{ApiJson, ApiPath, StudentRecordQuery};
use crate::{
    auth::{Auth, StaffOnly},
    error::ApiError,
    models::{AttendanceCreate, AttendanceUpdate, DeleteResponse},
    state::AppState,
    storage::{
        repository::{non_empty, AttendanceRecord, NewAttendance, StudentRecordFilter},
        AttendanceRepository, UserRepository,
    },
};

#[utoipa::path(
    get,
    path = "/attendance",
    tag = "Attendance",
    params(StudentRecordQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, body = [AttendanceRecord]))
)]
pub async fn list_attendance(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(query): Query<StudentRecordQuery>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError> {
    let filter = StudentRecordFilter::scoped_for(&user, query.usn.as_deref(), query.subject.as_deref());
    let records = AttendanceRepository::new(&state.db).list(&filter).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/attendance/{id}",
    tag = "Attendance",
    params(("id" = i64, Path, description = "Attendance record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = AttendanceRecord),
        (status = 403, description = "Record belongs to another student"),
        (status = 404, description = "Attendance record not found")
    )
)]
pub async fn get_attendance(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<AttendanceRecord>, ApiError> {
    let record = AttendanceRepository::new(&state.db).get(id).await?;
    if !user.can_view_student_record(&record.usn) {
        return Err(ApiError::forbidden("Not allowed to view this record"));
    }
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/attendance",
    tag = "Attendance",
    request_body = AttendanceCreate,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = AttendanceRecord),
        (status = 403, description = "Insufficient role permissions"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn create_attendance(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AttendanceCreate>,
) -> Result<(StatusCode, Json<AttendanceRecord>), ApiError> {
    request.validate()?;

    let student_id = UserRepository::new(&state.db)
        .resolve_student_id(&request.usn)
        .await?;

    let repo = AttendanceRepository::new(&state.db);
    let id = repo
        .create(&NewAttendance {
            student_id,
            subject: request.subject.trim().to_string(),
            date_range: request.date_range.trim().to_string(),
            classes_conducted: request.classes_conducted,
            classes_attended: request.classes_attended,
            created_by: user.id,
        })
        .await?;

    tracing::info!(attendance_id = id, created_by = %user.id, "Created attendance record");
    Ok((StatusCode::CREATED, Json(repo.get(id).await?)))
}

#[utoipa::path(
    put,
    path = "/attendance/{id}",
    tag = "Attendance",
    params(("id" = i64, Path, description = "Attendance record id")),
    request_body = AttendanceUpdate,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = AttendanceRecord),
        (status = 404, description = "Attendance record or student not found")
    )
)]
pub async fn update_attendance(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<AttendanceUpdate>,
) -> Result<Json<AttendanceRecord>, ApiError> {
    update.validate()?;

    let repo = AttendanceRepository::new(&state.db);
    let stored = repo.find_stored(id).await?;

    let student_id = match non_empty(update.usn.as_deref()) {
        Some(usn) => Some(UserRepository::new(&state.db).resolve_student_id(&usn).await?),
        None => None,
    };

    repo.update(id, &stored.merge(&update, student_id)).await?;
    tracing::info!(attendance_id = id, updated_by = %user.id, "Updated attendance record");

    Ok(Json(repo.get(id).await?))
}

#[utoipa::path(
    delete,
    path = "/attendance/{id}",
    tag = "Attendance",
    params(("id" = i64, Path, description = "Attendance record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = DeleteResponse),
        (status = 404, description = "Attendance record not found")
    )
)]
pub async fn delete_attendance(
    StaffOnly(user): StaffOnly,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    AttendanceRepository::new(&state.db).delete(id).await?;
    tracing::info!(attendance_id = id, deleted_by = %user.id, "Deleted attendance record");
    Ok(Json(DeleteResponse::for_id(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{AuthenticatedUser, Role},
        state::test_state,
    };

    fn staff() -> AuthenticatedUser {
        AuthenticatedUser {
            id: uuid::Uuid::new_v4(),
            login_id: "FCLT001".to_string(),
            full_name: "Faculty One".to_string(),
            role: Role::Faculty,
            branch: None,
            semester: None,
        }
    }

    #[tokio::test]
    async fn create_rejects_negative_counts() {
        let request = AttendanceCreate {
            usn: "4MH23IS001".to_string(),
            subject: "DBMS".to_string(),
            date_range: "Aug-Sep".to_string(),
            classes_conducted: 10,
            classes_attended: -1,
        };

        let err = create_attendance(StaffOnly(staff()), State(test_state()), ApiJson(request))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "classesAttended must be greater than or equal to 0");
    }

    #[tokio::test]
    async fn update_rejects_negative_counts() {
        let update = AttendanceUpdate {
            classes_conducted: Some(-3),
            ..AttendanceUpdate::default()
        };

        let err = update_attendance(StaffOnly(staff()), State(test_state()), ApiPath(7), ApiJson(update))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
