// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Syllabus repository.
//!
//! Syllabus rows are visible to every authenticated user; only staff write.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    super::{Database, StorageError, StorageResult},
    non_empty,
};
use crate::models::SyllabusUpdate;

const NOT_FOUND: &str = "Syllabus record not found";

const SELECT_RECORD: &str = "select
        s.id::text as id,
        s.branch,
        s.semester,
        s.subject,
        s.subject_code,
        s.content,
        s.file_name,
        s.file_data,
        s.file_type
    from syllabus s";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusRecord {
    pub id: String,
    pub branch: String,
    pub semester: String,
    pub subject: String,
    pub subject_code: Option<String>,
    pub content: Option<String>,
    pub file_name: Option<String>,
    /// Base64 attachment payload.
    pub file_data: Option<String>,
    pub file_type: Option<String>,
}

impl SyllabusRecord {
    /// Overlay a partial update onto the stored values.
    pub fn merge(self, update: &SyllabusUpdate) -> Self {
        Self {
            id: self.id,
            branch: update.branch.clone().unwrap_or(self.branch),
            semester: update.semester.clone().unwrap_or(self.semester),
            subject: update.subject.clone().unwrap_or(self.subject),
            subject_code: update.subject_code.clone().or(self.subject_code),
            content: update.content.clone().or(self.content),
            file_name: update.file_name.clone().or(self.file_name),
            file_data: update.file_data.clone().or(self.file_data),
            file_type: update.file_type.clone().or(self.file_type),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyllabusFilter {
    pub branch: Option<String>,
    pub semester: Option<String>,
    pub subject: Option<String>,
}

impl SyllabusFilter {
    pub fn new(branch: Option<&str>, semester: Option<&str>, subject: Option<&str>) -> Self {
        Self {
            branch: non_empty(branch),
            semester: non_empty(semester),
            subject: non_empty(subject),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewSyllabus {
    pub branch: String,
    pub semester: String,
    pub subject: String,
    pub subject_code: Option<String>,
    pub content: Option<String>,
    pub file_name: Option<String>,
    pub file_data: Option<String>,
    pub file_type: Option<String>,
    pub created_by: Uuid,
}

/// Syllabus columns used to build AI reference context.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct SyllabusReference {
    pub subject: String,
    pub subject_code: Option<String>,
    pub content: Option<String>,
    pub file_name: Option<String>,
}

pub struct SyllabusRepository<'a> {
    db: &'a Database,
}

impl<'a> SyllabusRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &SyllabusFilter) -> StorageResult<Vec<SyllabusRecord>> {
        let sql = format!(
            "{SELECT_RECORD}
             where ($1::text is null or s.branch = $1)
               and ($2::text is null or s.semester = $2)
               and ($3::text is null or s.subject = $3)
             order by s.created_at desc, s.id desc"
        );
        let rows = sqlx::query_as::<_, SyllabusRecord>(&sql)
            .bind(&filter.branch)
            .bind(&filter.semester)
            .bind(&filter.subject)
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> StorageResult<SyllabusRecord> {
        let sql = format!("{SELECT_RECORD} where s.id = $1");
        sqlx::query_as::<_, SyllabusRecord>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| StorageError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(&self, row: &NewSyllabus) -> StorageResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "insert into syllabus
               (branch, semester, subject, subject_code, content, file_name, file_data, file_type, created_by)
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             returning id",
        )
        .bind(&row.branch)
        .bind(&row.semester)
        .bind(&row.subject)
        .bind(&row.subject_code)
        .bind(&row.content)
        .bind(&row.file_name)
        .bind(&row.file_data)
        .bind(&row.file_type)
        .bind(row.created_by)
        .fetch_one(self.db.pool())
        .await?;
        Ok(id)
    }

    /// Write every mutable column of `row` back to storage.
    pub async fn update(&self, id: i64, row: &SyllabusRecord) -> StorageResult<()> {
        let result = sqlx::query(
            "update syllabus
             set branch = $1,
                 semester = $2,
                 subject = $3,
                 subject_code = $4,
                 content = $5,
                 file_name = $6,
                 file_data = $7,
                 file_type = $8
             where id = $9",
        )
        .bind(&row.branch)
        .bind(&row.semester)
        .bind(&row.subject)
        .bind(&row.subject_code)
        .bind(&row.content)
        .bind(&row.file_name)
        .bind(&row.file_data)
        .bind(&row.file_type)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query("delete from syllabus where id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }

    /// Newest rows for an exact branch and semester, optionally narrowed to
    /// a subject compared case-insensitively.
    pub async fn recent_for_context(
        &self,
        branch: &str,
        semester: &str,
        subject: Option<&str>,
        limit: i64,
    ) -> StorageResult<Vec<SyllabusReference>> {
        let rows = sqlx::query_as::<_, SyllabusReference>(
            "select subject, subject_code, content, file_name
             from syllabus
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

    fn record() -> SyllabusRecord {
        SyllabusRecord {
            id: "3".to_string(),
            branch: "ISE".to_string(),
            semester: "3rd Semester".to_string(),
            subject: "Data Structures".to_string(),
            subject_code: Some("BCS304".to_string()),
            content: Some("Stacks, queues".to_string()),
            file_name: None,
            file_data: None,
            file_type: None,
        }
    }

    #[test]
    fn merge_overwrites_only_provided_fields() {
        let update = SyllabusUpdate {
            content: Some("Trees, graphs".to_string()),
            file_name: Some("ds.pdf".to_string()),
            ..Default::default()
        };
        let merged = record().merge(&update);
        assert_eq!(merged.id, "3");
        assert_eq!(merged.subject, "Data Structures");
        assert_eq!(merged.subject_code.as_deref(), Some("BCS304"));
        assert_eq!(merged.content.as_deref(), Some("Trees, graphs"));
        assert_eq!(merged.file_name.as_deref(), Some("ds.pdf"));
    }

    #[test]
    fn filter_drops_empty_values() {
        let filter = SyllabusFilter::new(Some("ISE"), Some(""), None);
        assert_eq!(filter.branch.as_deref(), Some("ISE"));
        assert_eq!(filter.semester, None);
        assert_eq!(filter.subject, None);
    }

    #[test]
    fn record_serializes_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["subjectCode"], "BCS304");
        assert!(json["fileData"].is_null());
    }
}
