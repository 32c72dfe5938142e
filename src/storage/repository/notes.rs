// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Study notes repository.
//!
//! Students only see notes for their own branch and semester (each applied
//! only when set on their account).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    super::{Database, StorageError, StorageResult},
    non_empty,
};
use crate::auth::{AuthenticatedUser, Role};

const NOT_FOUND: &str = "Note not found";

const SELECT_RECORD: &str = "select
        n.id::text as id,
        n.title,
        n.subject,
        n.branch,
        n.semester,
        n.scheme,
        n.file_name,
        n.file_data,
        n.file_type,
        coalesce(u.login_id, 'faculty') as uploaded_by,
        (extract(epoch from n.created_at) * 1000)::bigint as timestamp
    from notes n
    left join users u on u.id = n.uploaded_by";

const FILTER_CLAUSE: &str = "($1::text is null or n.branch = $1)
    and ($2::text is null or n.semester = $2)
    and ($3::text is null or n.branch = $3)
    and ($4::text is null or n.semester = $4)
    and ($5::text is null or n.subject = $5)";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub branch: String,
    pub semester: String,
    pub scheme: Option<String>,
    pub file_name: String,
    /// Base64 attachment payload.
    pub file_data: String,
    pub file_type: Option<String>,
    /// Uploader's login id, or `faculty` when unknown.
    pub uploaded_by: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
}

/// Row filter for notes: a role scope plus explicit query filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub scope_branch: Option<String>,
    pub scope_semester: Option<String>,
    pub branch: Option<String>,
    pub semester: Option<String>,
    pub subject: Option<String>,
}

impl NoteFilter {
    /// Scope only, no explicit filters.
    pub fn scope_for(user: &AuthenticatedUser) -> Self {
        match user.role {
            Role::Student => Self {
                scope_branch: non_empty(user.branch.as_deref()),
                scope_semester: non_empty(user.semester.as_deref()),
                ..Self::default()
            },
            Role::Faculty | Role::Hod => Self::default(),
        }
    }

    pub fn scoped_for(
        user: &AuthenticatedUser,
        branch: Option<&str>,
        semester: Option<&str>,
        subject: Option<&str>,
    ) -> Self {
        Self {
            branch: non_empty(branch),
            semester: non_empty(semester),
            subject: non_empty(subject),
            ..Self::scope_for(user)
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub subject: String,
    pub branch: String,
    pub semester: String,
    pub scheme: Option<String>,
    pub file_name: String,
    pub file_data: String,
    pub file_type: Option<String>,
    pub uploaded_by: Uuid,
}

/// Note columns used to build AI reference context.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct NoteReference {
    pub title: String,
    pub subject: String,
    pub file_name: String,
    pub scheme: Option<String>,
}

pub struct NoteRepository<'a> {
    db: &'a Database,
}

impl<'a> NoteRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &NoteFilter) -> StorageResult<Vec<NoteRecord>> {
        let sql = format!(
            "{SELECT_RECORD}
             where {FILTER_CLAUSE}
             order by n.created_at desc, n.id desc"
        );
        let rows = sqlx::query_as::<_, NoteRecord>(&sql)
            .bind(&filter.scope_branch)
            .bind(&filter.scope_semester)
            .bind(&filter.branch)
            .bind(&filter.semester)
            .bind(&filter.subject)
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows)
    }

    /// Fetch one note; rows outside the filter are reported as not found.
    pub async fn get(&self, id: i64, filter: &NoteFilter) -> StorageResult<NoteRecord> {
        let sql = format!("{SELECT_RECORD} where {FILTER_CLAUSE} and n.id = $6");
        sqlx::query_as::<_, NoteRecord>(&sql)
            .bind(&filter.scope_branch)
            .bind(&filter.scope_semester)
            .bind(&filter.branch)
            .bind(&filter.semester)
            .bind(&filter.subject)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| StorageError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(&self, note: &NewNote) -> StorageResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "insert into notes
               (title, subject, branch, semester, scheme, file_name, file_data, file_type, uploaded_by)
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             returning id",
        )
        .bind(&note.title)
        .bind(&note.subject)
        .bind(&note.branch)
        .bind(&note.semester)
        .bind(&note.scheme)
        .bind(&note.file_name)
        .bind(&note.file_data)
        .bind(&note.file_type)
        .bind(note.uploaded_by)
        .fetch_one(self.db.pool())
        .await?;
        Ok(id)
    }

    pub async fn delete(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query("delete from notes where id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }

    /// Newest notes for an exact branch and semester, optionally narrowed to
    /// a subject compared case-insensitively.
    pub async fn recent_for_context(
        &self,
        branch: &str,
        semester: &str,
        subject: Option<&str>,
        limit: i64,
    ) -> StorageResult<Vec<NoteReference>> {
        let rows = sqlx::query_as::<_, NoteReference>(
            "select title, subject, file_name, scheme
             from notes
             where branch = $1
               and semester = $2
               and ($3::text is null or lower(trim(subject)) = lower(trim($3)))
             order by created_at desc, id desc
             limit $4",
        )
        .bind(branch)
        .bind(semester)
        .bind(subject)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, branch: Option<&str>, semester: Option<&str>) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            login_id: "4MH23IS004".to_string(),
            full_name: "Student 04".to_string(),
            role,
            branch: branch.map(str::to_string),
            semester: semester.map(str::to_string),
        }
    }

    #[test]
    fn students_are_scoped_to_branch_and_semester() {
        let student = user(Role::Student, Some("ISE"), Some("3rd Semester"));
        let filter = NoteFilter::scoped_for(&student, None, None, Some("DBMS"));
        assert_eq!(filter.scope_branch.as_deref(), Some("ISE"));
        assert_eq!(filter.scope_semester.as_deref(), Some("3rd Semester"));
        assert_eq!(filter.subject.as_deref(), Some("DBMS"));
    }

    #[test]
    fn unset_student_attributes_do_not_scope() {
        let student = user(Role::Student, Some("ISE"), None);
        let filter = NoteFilter::scope_for(&student);
        assert_eq!(filter.scope_branch.as_deref(), Some("ISE"));
        assert_eq!(filter.scope_semester, None);
    }

    #[test]
    fn explicit_filters_are_kept_alongside_scope() {
        let student = user(Role::Student, Some("ISE"), Some("3rd Semester"));
        let filter = NoteFilter::scoped_for(&student, Some("CSE"), None, None);
        assert_eq!(filter.scope_branch.as_deref(), Some("ISE"));
        assert_eq!(filter.branch.as_deref(), Some("CSE"));
    }

    #[test]
    fn staff_are_not_scoped() {
        let hod = user(Role::Hod, Some("ISE"), Some("3rd Semester"));
        let filter = NoteFilter::scoped_for(&hod, Some(""), Some("5th Semester"), None);
        assert_eq!(filter.scope_branch, None);
        assert_eq!(filter.scope_semester, None);
        assert_eq!(filter.branch, None);
        assert_eq!(filter.semester.as_deref(), Some("5th Semester"));
    }
}
