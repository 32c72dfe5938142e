// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Attendance repository.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{
    super::{Database, StorageError, StorageResult},
    StudentRecordFilter,
};
use crate::models::AttendanceUpdate;

const NOT_FOUND: &str = "Attendance record not found";

const SELECT_RECORD: &str = "select
        a.id::text as id,
        u.login_id as usn,
        a.subject,
        a.date_range,
        a.classes_conducted,
        a.classes_attended
    from attendance a
    join users u on u.id = a.student_id";

/// Attendance summary as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    /// Login id of the student the row belongs to.
    pub usn: String,
    pub subject: String,
    pub date_range: String,
    pub classes_conducted: i32,
    pub classes_attended: i32,
}

/// Mutable columns of an attendance row.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct StoredAttendance {
    pub student_id: Uuid,
    pub subject: String,
    pub date_range: String,
    pub classes_conducted: i32,
    pub classes_attended: i32,
}

impl StoredAttendance {
    /// Overlay a partial update. `student_id` is the re-resolved USN, if any.
    pub fn merge(self, update: &AttendanceUpdate, student_id: Option<Uuid>) -> Self {
        Self {
            student_id: student_id.unwrap_or(self.student_id),
            subject: update.subject.clone().unwrap_or(self.subject),
            date_range: update.date_range.clone().unwrap_or(self.date_range),
            classes_conducted: update.classes_conducted.unwrap_or(self.classes_conducted),
            classes_attended: update.classes_attended.unwrap_or(self.classes_attended),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub student_id: Uuid,
    pub subject: String,
    pub date_range: String,
    pub classes_conducted: i32,
    pub classes_attended: i32,
    pub created_by: Uuid,
}

pub struct AttendanceRepository<'a> {
    db: &'a Database,
}

impl<'a> AttendanceRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List rows matching the filter, newest first.
    pub async fn list(&self, filter: &StudentRecordFilter) -> StorageResult<Vec<AttendanceRecord>> {
        let sql = format!(
            "{SELECT_RECORD}
             where ($1::text is null or u.login_id = $1)
               and ($2::text is null or a.subject = $2)
             order by a.created_at desc, a.id desc"
        );
        let rows = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(&filter.login_id)
            .bind(&filter.subject)
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> StorageResult<AttendanceRecord> {
        let sql = format!("{SELECT_RECORD} where a.id = $1");
        sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| StorageError::NotFound(NOT_FOUND.to_string()))
    }

    /// Insert a row and return its id.
    pub async fn create(&self, row: &NewAttendance) -> StorageResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "insert into attendance
               (student_id, subject, date_range, classes_conducted, classes_attended, created_by)
             values ($1, $2, $3, $4, $5, $6)
             returning id",
        )
        .bind(row.student_id)
        .bind(&row.subject)
        .bind(&row.date_range)
        .bind(row.classes_conducted)
        .bind(row.classes_attended)
        .bind(row.created_by)
        .fetch_one(self.db.pool())
        .await?;
        Ok(id)
    }

    pub async fn find_stored(&self, id: i64) -> StorageResult<StoredAttendance> {
        sqlx::query_as::<_, StoredAttendance>(
            "select student_id, subject, date_range, classes_conducted, classes_attended
             from attendance where id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| StorageError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn update(&self, id: i64, row: &StoredAttendance) -> StorageResult<()> {
        let result = sqlx::query(
            "update attendance
             set student_id = $1,
                 subject = $2,
                 date_range = $3,
                 classes_conducted = $4,
                 classes_attended = $5
             where id = $6",
        )
        .bind(row.student_id)
        .bind(&row.subject)
        .bind(&row.date_range)
        .bind(row.classes_conducted)
        .bind(row.classes_attended)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query("delete from attendance where id = $1")
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

    fn stored() -> StoredAttendance {
        StoredAttendance {
            student_id: Uuid::nil(),
            subject: "DBMS".to_string(),
            date_range: "Aug 1 - Aug 31".to_string(),
            classes_conducted: 20,
            classes_attended: 18,
        }
    }

    #[test]
    fn merge_keeps_omitted_fields() {
        let update = AttendanceUpdate {
            classes_attended: Some(19),
            ..Default::default()
        };
        let merged = stored().merge(&update, None);
        assert_eq!(merged.classes_attended, 19);
        assert_eq!(merged.classes_conducted, 20);
        assert_eq!(merged.subject, "DBMS");
        assert_eq!(merged.student_id, Uuid::nil());
    }

    #[test]
    fn merge_applies_new_student_and_zero_values() {
        let new_student = Uuid::new_v4();
        let update = AttendanceUpdate {
            subject: Some(String::new()),
            classes_conducted: Some(0),
            ..Default::default()
        };
        let merged = stored().merge(&update, Some(new_student));
        assert_eq!(merged.student_id, new_student);
        assert_eq!(merged.subject, "");
        assert_eq!(merged.classes_conducted, 0);
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = AttendanceRecord {
            id: "7".to_string(),
            usn: "4MH23IS001".to_string(),
            subject: "DBMS".to_string(),
            date_range: "Aug".to_string(),
            classes_conducted: 20,
            classes_attended: 18,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dateRange"], "Aug");
        assert_eq!(json["classesConducted"], 20);
        assert_eq!(json["id"], "7");
    }
}
