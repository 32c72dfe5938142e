// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies shared by the REST handlers. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and OpenAPI
//! documentation. Record bodies use the camelCase field names the web client
//! expects; auth bodies keep snake_case.
//!
//! ## Model Categories
//!
//! - **Auth**: Registration, login and seed account summaries
//! - **Attendance / Marks**: Per-student records keyed by USN
//! - **Syllabus / Notes**: Course material with optional base64 attachments

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{AuthenticatedUser, Role},
    error::ApiError,
};

// =============================================================================
// Validation Helpers
// =============================================================================

/// Check a field's length in characters.
fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::invalid_input(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: Option<i32>) -> Result<(), ApiError> {
    match value {
        Some(v) if v < 0 => Err(ApiError::invalid_input(format!(
            "{field} must be greater than or equal to 0"
        ))),
        _ => Ok(()),
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub login_id: String,
    pub full_name: String,
    pub role: Role,
    pub password: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_len("login_id", &self.login_id, 3, 100)?;
        check_len("full_name", &self.full_name, 2, 120)?;
        check_len("password", &self.password, 6, 128)?;
        if self.login_id.trim().is_empty() || self.full_name.trim().is_empty() {
            return Err(ApiError::invalid_input("login_id and full_name are required"));
        }
        Ok(())
    }
}

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_len("login_id", &self.login_id, 3, 100)?;
        check_len("password", &self.password, 6, 128)
    }
}

/// Issued bearer token plus the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    pub user: AuthenticatedUser,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user: AuthenticatedUser) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SeedCredential {
    pub login_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SeedStudentRange {
    pub from: String,
    pub to: String,
    pub password: String,
}

/// Credentials of the seeded demo accounts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SeedSummary {
    pub ok: bool,
    pub faculty: SeedCredential,
    pub students: SeedStudentRange,
}

// =============================================================================
// Attendance Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCreate {
    /// Student login id (USN), matched case-insensitively.
    pub usn: String,
    pub subject: String,
    pub date_range: String,
    pub classes_conducted: i32,
    pub classes_attended: i32,
}

impl AttendanceCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_len("usn", &self.usn, 3, 100)?;
        check_len("subject", &self.subject, 1, 200)?;
        check_len("dateRange", &self.date_range, 1, 200)?;
        check_non_negative("classesConducted", Some(self.classes_conducted))?;
        check_non_negative("classesAttended", Some(self.classes_attended))
    }
}

/// Partial attendance update; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdate {
    #[serde(default)]
    pub usn: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub date_range: Option<String>,
    #[serde(default)]
    pub classes_conducted: Option<i32>,
    #[serde(default)]
    pub classes_attended: Option<i32>,
}

impl AttendanceUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_non_negative("classesConducted", self.classes_conducted)?;
        check_non_negative("classesAttended", self.classes_attended)
    }
}

// =============================================================================
// Marks Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarksCreate {
    pub usn: String,
    pub subject: String,
    #[serde(default)]
    pub internal1: Option<i32>,
    #[serde(default)]
    pub internal2: Option<i32>,
    #[serde(default)]
    pub internal3: Option<i32>,
}

impl MarksCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_len("usn", &self.usn, 3, 100)?;
        check_len("subject", &self.subject, 1, 200)
    }
}

/// Partial marks update. An explicit `null` internal is treated as omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarksUpdate {
    #[serde(default)]
    pub usn: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub internal1: Option<i32>,
    #[serde(default)]
    pub internal2: Option<i32>,
    #[serde(default)]
    pub internal3: Option<i32>,
}

// =============================================================================
// Syllabus Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusCreate {
    pub branch: String,
    pub semester: String,
    pub subject: String,
    #[serde(default)]
    pub subject_code: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Base64 attachment payload.
    #[serde(default)]
    pub file_data: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

impl SyllabusCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_len("branch", &self.branch, 1, 120)?;
        check_len("semester", &self.semester, 1, 120)?;
        check_len("subject", &self.subject, 1, 200)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusUpdate {
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub subject_code: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_data: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

// =============================================================================
// Note Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteCreate {
    pub title: String,
    pub subject: String,
    pub branch: String,
    pub semester: String,
    #[serde(default)]
    pub scheme: Option<String>,
    pub file_name: String,
    /// Base64 attachment payload.
    pub file_data: String,
    #[serde(default)]
    pub file_type: Option<String>,
}

impl NoteCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_len("title", &self.title, 1, 300)?;
        check_len("subject", &self.subject, 1, 200)?;
        check_len("branch", &self.branch, 1, 120)?;
        check_len("semester", &self.semester, 1, 120)?;
        check_len("fileName", &self.file_name, 1, 500)?;
        if self.file_data.is_empty() {
            return Err(ApiError::invalid_input("fileData must not be empty"));
        }
        Ok(())
    }
}

// =============================================================================
// Shared Responses
// =============================================================================

/// Response after a hard delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DeleteResponse {
    pub ok: bool,
    pub deleted_id: String,
}

impl DeleteResponse {
    pub fn for_id(id: i64) -> Self {
        Self {
            ok: true,
            deleted_id: id.to_string(),
        }
    }
}
