// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{DefaultBodyLimit, FromRequest, FromRequestParts},
    http::{request::Parts, HeaderValue},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    IntoParams, Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    ai::{AiTask, QpType, SearchState},
    auth::{AuthenticatedUser, Role},
    config::CorsOrigins,
    error::ApiError,
    models::{
        AttendanceCreate, AttendanceUpdate, DeleteResponse, LoginRequest, MarksCreate,
        MarksUpdate, NoteCreate, RegisterRequest, SeedCredential, SeedStudentRange, SeedSummary,
        SyllabusCreate, SyllabusUpdate, TokenResponse,
    },
    state::AppState,
    storage::repository::{AttendanceRecord, MarksRecord, NoteRecord, SyllabusRecord},
};

pub mod ai;
pub mod attendance;
pub mod auth;
pub mod health;
pub mod marks;
pub mod notes;
pub mod syllabus;

/// JSON body extractor that rejects with the API's `{"detail"}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor that rejects with the API's `{"detail"}` body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query filters for attendance and marks. `usn` is ignored for students.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StudentRecordQuery {
    pub usn: Option<String>,
    pub subject: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    let cors = cors_layer(&state.config.cors_origins);

    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/db-check", get(health::db_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/seed-users", post(auth::seed_users))
        .route("/auth/me", get(auth::me))
        .route(
            "/attendance",
            get(attendance::list_attendance).post(attendance::create_attendance),
        )
        .route(
            "/attendance/{id}",
            get(attendance::get_attendance)
                .put(attendance::update_attendance)
                .delete(attendance::delete_attendance),
        )
        .route("/marks", get(marks::list_marks).post(marks::create_marks))
        .route(
            "/marks/{id}",
            get(marks::get_marks)
                .put(marks::update_marks)
                .delete(marks::delete_marks),
        )
        .route(
            "/syllabus",
            get(syllabus::list_syllabus).post(syllabus::create_syllabus),
        )
        .route(
            "/syllabus/{id}",
            get(syllabus::get_syllabus)
                .put(syllabus::update_syllabus)
                .delete(syllabus::delete_syllabus),
        )
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/{id}",
            get(notes::get_note).delete(notes::delete_note),
        )
        .route("/ai/syllabus", post(ai::syllabus_lookup))
        .route("/ai/notes", post(ai::notes_lookup))
        .route("/ai/task", post(ai::run_task))
        .route("/ai/chat", post(ai::chat))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(cors)
}

/// Credentialed CORS restricted to the configured front-ends and local dev
/// servers; methods and headers are mirrored from the preflight.
fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let origins = origins.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin.to_str().is_ok_and(|origin| origins.allows(origin))
            },
        ))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::db_check,
        auth::register,
        auth::login,
        auth::seed_users,
        auth::me,
        attendance::list_attendance,
        attendance::get_attendance,
        attendance::create_attendance,
        attendance::update_attendance,
        attendance::delete_attendance,
        marks::list_marks,
        marks::get_marks,
        marks::create_marks,
        marks::update_marks,
        marks::delete_marks,
        syllabus::list_syllabus,
        syllabus::get_syllabus,
        syllabus::create_syllabus,
        syllabus::update_syllabus,
        syllabus::delete_syllabus,
        notes::list_notes,
        notes::get_note,
        notes::create_note,
        notes::delete_note,
        ai::syllabus_lookup,
        ai::notes_lookup,
        ai::run_task,
        ai::chat
    ),
    components(
        schemas(
            Role,
            AuthenticatedUser,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            SeedCredential,
            SeedStudentRange,
            SeedSummary,
            AttendanceRecord,
            AttendanceCreate,
            AttendanceUpdate,
            MarksRecord,
            MarksCreate,
            MarksUpdate,
            SyllabusRecord,
            SyllabusCreate,
            SyllabusUpdate,
            NoteRecord,
            NoteCreate,
            DeleteResponse,
            SearchState,
            AiTask,
            QpType,
            ai::AiTaskRequest,
            ai::AiChatRequest,
            ai::AiTextResponse,
            ai::AiTextWithLinks,
            health::HealthResponse,
            health::DbCheckResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database probes"),
        (name = "Auth", description = "Registration, login and identity"),
        (name = "Attendance", description = "Per-student attendance summaries"),
        (name = "Marks", description = "Internal assessment marks"),
        (name = "Syllabus", description = "Course syllabus records"),
        (name = "Notes", description = "Lecture notes with inline attachments"),
        (name = "AI", description = "LLM-assisted teaching tools")
    )
)]
struct ApiDoc;
