// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are keyed by a UUID and a unique `login_id`. For students the
//! login id is their USN.

use sqlx::FromRow;
use uuid::Uuid;

use super::super::{Database, StorageError, StorageResult};
use crate::auth::{AuthenticatedUser, Role};

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: Uuid,
    login_id: String,
    full_name: String,
    role: String,
    branch: Option<String>,
    semester: Option<String>,
}

impl TryFrom<UserRow> for AuthenticatedUser {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| StorageError::InvalidRow(format!("unknown role `{}`", row.role)))?;
        Ok(AuthenticatedUser {
            id: row.id,
            login_id: row.login_id,
            full_name: row.full_name,
            role,
            branch: row.branch,
            semester: row.semester,
        })
    }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// A user to insert; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login_id: String,
    pub full_name: String,
    pub role: Role,
    pub password_hash: String,
    pub branch: Option<String>,
    pub semester: Option<String>,
}

/// Repository for user accounts.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new user. A taken login id is a `Conflict`.
    pub async fn create(&self, user: &NewUser) -> StorageResult<AuthenticatedUser> {
        let row = sqlx::query_as::<_, UserRow>(
            "insert into users (login_id, full_name, role, password_hash, branch, semester)
             values ($1, $2, $3, $4, $5, $6)
             returning id, login_id, full_name, role, branch, semester",
        )
        .bind(&user.login_id)
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(&user.branch)
        .bind(&user.semester)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| match StorageError::from(e) {
            StorageError::Conflict(_) => StorageError::Conflict("login_id already exists".to_string()),
            other => other,
        })?;

        row.try_into()
    }

    /// Insert or overwrite a user by login id.
    pub async fn upsert(&self, user: &NewUser) -> StorageResult<()> {
        sqlx::query(
            "insert into users (login_id, full_name, role, password_hash, branch, semester)
             values ($1, $2, $3, $4, $5, $6)
             on conflict (login_id) do update
             set full_name = excluded.full_name,
                 role = excluded.role,
                 password_hash = excluded.password_hash,
                 branch = excluded.branch,
                 semester = excluded.semester",
        )
        .bind(&user.login_id)
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(&user.branch)
        .bind(&user.semester)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<AuthenticatedUser>> {
        let row = sqlx::query_as::<_, UserRow>(
            "select id, login_id, full_name, role, branch, semester from users where id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(AuthenticatedUser::try_from).transpose()
    }

    /// Look up a user and their password hash by exact login id.
    pub async fn find_credentials(
        &self,
        login_id: &str,
    ) -> StorageResult<Option<(AuthenticatedUser, String)>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "select id, login_id, full_name, role, branch, semester, password_hash
             from users where login_id = $1",
        )
        .bind(login_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => Ok(Some((row.user.try_into()?, row.password_hash))),
            None => Ok(None),
        }
    }

    /// Resolve a USN to a user id, ignoring case and surrounding whitespace.
    ///
    /// Student accounts win over other roles sharing the same login id.
    pub async fn resolve_student_id(&self, usn: &str) -> StorageResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "select id from users
             where upper(trim(login_id)) = upper(trim($1))
             order by (lower(trim(role)) = 'student') desc
             limit 1",
        )
        .bind(usn.trim())
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("Student not found: {usn}")))
    }
}
