// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AuthError, AuthenticatedUser};

/// User roles for authorization.
///
/// ## Role Model
///
/// - `Student` - Reads own attendance/marks and notes for own branch/semester
/// - `Faculty` - Creates, updates and deletes academic records; runs AI tasks
/// - `Hod` - Head of department, same write access as faculty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Hod,
}

impl Role {
    /// Roles allowed to mutate academic records.
    pub const STAFF: [Role; 2] = [Role::Faculty, Role::Hod];

    /// Parse role from string (case-insensitive, surrounding whitespace ignored).
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Role::Student),
            "faculty" => Some(Role::Faculty),
            "hod" => Some(Role::Hod),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Hod => "hod",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reject the request unless the user's role is in `allowed`.
pub fn require_roles(user: &AuthenticatedUser, allowed: &[Role]) -> Result<(), AuthError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions)
    }
}
