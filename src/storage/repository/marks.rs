// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Internal assessment marks repository.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    super::{Database, StorageError, StorageResult},
    StudentRecordFilter,
};
use crate::models::MarksUpdate;

const NOT_FOUND: &str = "Marks record not found";

const SELECT_RECORD: &str = "select
        m.id::text as id,
        u.login_id as usn,
        m.subject,
        m.internal1,
        m.internal2,
        m.internal3
    from marks m
    join users u on u.id = m.student_id";

/// Marks for one subject; each internal is optional.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, PartialEq, Eq)]
pub struct MarksRecord {
    pub id: String,
    pub usn: String,
    pub subject: String,
    pub internal1: Option<i32>,
    pub internal2: Option<i32>,
    pub internal3: Option<i32>,
}

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct StoredMarks {
    pub student_id: Uuid,
    pub subject: String,
    pub internal1: Option<i32>,
    pub internal2: Option<i32>,
    pub internal3: Option<i32>,
}

impl StoredMarks {
    pub fn merge(self, update: &MarksUpdate, student_id: Option<Uuid>) -> Self {
        Self {
            student_id: student_id.unwrap_or(self.student_id),
            subject: update.subject.clone().unwrap_or(self.subject),
            internal1: update.internal1.or(self.internal1),
            internal2: update.internal2.or(self.internal2),
            internal3: update.internal3.or(self.internal3),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewMarks {
    pub student_id: Uuid,
    pub subject: String,
    pub internal1: Option<i32>,
    pub internal2: Option<i32>,
    pub internal3: Option<i32>,
    pub created_by: Uuid,
}

pub struct MarksRepository<'a> {
    db: &'a Database,
}

impl<'a> MarksRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &StudentRecordFilter) -> StorageResult<Vec<MarksRecord>> {
        let sql = format!(
            "{SELECT_RECORD}
             where ($1::text is null or u.login_id = $1)
               and ($2::text is null or m.subject = $2)
             order by m.created_at desc, m.id desc"
        );
        let rows = sqlx::query_as::<_, MarksRecord>(&sql)
            .bind(&filter.login_id)
            .bind(&filter.subject)
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> StorageResult<MarksRecord> {
        let sql = format!("{SELECT_RECORD} where m.id = $1");
        sqlx::query_as::<_, MarksRecord>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| StorageError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(&self, row: &NewMarks) -> StorageResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "insert into marks (student_id, subject, internal1, internal2, internal3, created_by)
             values ($1, $2, $3, $4, $5, $6)
             returning id",
        )
        .bind(row.student_id)
        .bind(&row.subject)
        .bind(row.internal1)
        .bind(row.internal2)
        .bind(row.internal3)
        .bind(row.created_by)
        .fetch_one(self.db.pool())
        .await?;
        Ok(id)
    }

    pub async fn find_stored(&self, id: i64) -> StorageResult<StoredMarks> {
        sqlx::query_as::<_, StoredMarks>(
            "select student_id, subject, internal1, internal2, internal3 from marks where id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| StorageError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn update(&self, id: i64, row: &StoredMarks) -> StorageResult<()> {
        let result = sqlx::query(
            "update marks
             set student_id = $1,
                 subject = $2,
                 internal1 = $3,
                 internal2 = $4,
                 internal3 = $5
             where id = $6",
        )
        .bind(row.student_id)
        .bind(&row.subject)
        .bind(row.internal1)
        .bind(row.internal2)
        .bind(row.internal3)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query("delete from marks where id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_only_overwrites_provided_internals() {
        let stored = StoredMarks {
            student_id: Uuid::nil(),
            subject: "DBMS".to_string(),
            internal1: Some(18),
            internal2: None,
            internal3: Some(20),
        };
        let update = MarksUpdate {
            internal2: Some(15),
            ..Default::default()
        };

        let merged = stored.merge(&update, None);
        assert_eq!(merged.internal1, Some(18));
        assert_eq!(merged.internal2, Some(15));
        assert_eq!(merged.internal3, Some(20));
        assert_eq!(merged.subject, "DBMS");
    }

    #[test]
    fn subject_only_update_keeps_every_internal() {
        let student = Uuid::new_v4();
        let stored = StoredMarks {
            student_id: student,
            subject: "DBMS".to_string(),
            internal1: Some(18),
            internal2: Some(12),
            internal3: None,
        };
        let update = MarksUpdate {
            subject: Some("Operating Systems".to_string()),
            ..Default::default()
        };

        let merged = stored.merge(&update, None);
        assert_eq!(merged.subject, "Operating Systems");
        assert_eq!(merged.student_id, student);
        assert_eq!(merged.internal1, Some(18));
        assert_eq!(merged.internal2, Some(12));
        assert_eq!(merged.internal3, None);
    }
}
