// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roles::Role;

/// Claims carried by an issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id, UUID)
    pub sub: String,
    /// Role at issue time; informational only, the stored role is authoritative
    pub role: Role,
    /// Login id at issue time
    pub login_id: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Public projection of a user, re-read from storage on every request.
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub login_id: String,
    pub full_name: String,
    pub role: Role,
    pub branch: Option<String>,
    pub semester: Option<String>,
}

impl AuthenticatedUser {
    /// Whether this user may read an attendance or marks row belonging to `usn`.
    pub fn can_view_student_record(&self, usn: &str) -> bool {
        match self.role {
            Role::Student => self.login_id == usn,
            Role::Faculty | Role::Hod => true,
        }
    }
}
