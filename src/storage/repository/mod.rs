// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to PostgreSQL.
//!
//! Each repository provides CRUD operations for one table. Filters are
//! bound as nullable parameters (`$1::text is null or col = $1`) so every
//! operation is a single static statement.

pub mod attendance;
pub mod marks;
pub mod notes;
pub mod syllabus;
pub mod users;

pub use attendance::{AttendanceRecord, AttendanceRepository, NewAttendance, StoredAttendance};
pub use marks::{MarksRecord, MarksRepository, NewMarks, StoredMarks};
pub use notes::{NewNote, NoteFilter, NoteRecord, NoteReference, NoteRepository};
pub use syllabus::{
    NewSyllabus, SyllabusFilter, SyllabusRecord, SyllabusReference, SyllabusRepository,
};
pub use users::{NewUser, UserRepository};

use crate::auth::{AuthenticatedUser, Role};

/// Treat absent and empty query values alike.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Row filter for per-student tables (attendance, marks).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRecordFilter {
    pub login_id: Option<String>,
    pub subject: Option<String>,
}

impl StudentRecordFilter {
    /// Build the filter a caller is allowed to run.
    ///
    /// Students always see only their own rows and cannot filter by USN.
    pub fn scoped_for(user: &AuthenticatedUser, usn: Option<&str>, subject: Option<&str>) -> Self {
        let login_id = match user.role {
            Role::Student => Some(user.login_id.clone()),
            Role::Faculty | Role::Hod => non_empty(usn),
        };
        Self {
            login_id,
            subject: non_empty(subject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Role, login_id: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            login_id: login_id.to_string(),
            full_name: "Someone".to_string(),
            role,
            branch: None,
            semester: None,
        }
    }

    #[test]
    fn students_are_forced_to_their_own_rows() {
        let filter = StudentRecordFilter::scoped_for(
            &user(Role::Student, "4MH23IS001"),
            Some("4MH23IS002"),
            Some("DBMS"),
        );
        assert_eq!(filter.login_id.as_deref(), Some("4MH23IS001"));
        assert_eq!(filter.subject.as_deref(), Some("DBMS"));
    }

    #[test]
    fn staff_may_filter_by_usn() {
        let filter = StudentRecordFilter::scoped_for(&user(Role::Faculty, "FCLT001"), Some("4MH23IS002"), None);
        assert_eq!(filter.login_id.as_deref(), Some("4MH23IS002"));
        assert_eq!(filter.subject, None);
    }

    #[test]
    fn empty_values_mean_no_filter() {
        let filter = StudentRecordFilter::scoped_for(&user(Role::Hod, "HOD01"), Some(""), Some(""));
        assert_eq!(filter, StudentRecordFilter::default());
    }
}
