// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! PostgreSQL persistence for users and academic records.
//!
//! ## Tables
//!
//! ```text
//! users        # login accounts (uuid id, role, branch/semester)
//! attendance   # per-student attendance summaries
//! marks        # per-student internal assessment marks
//! syllabus     # syllabus entries, optional base64 attachment
//! notes        # study notes with a required base64 attachment
//! ```
//!
//! ## Important Notes
//!
//! - Every query checks a connection out of the shared pool for its own
//!   duration; there are no multi-statement transactions
//! - Password hashes are only read by `UserRepository::find_credentials`

pub mod repository;
pub mod schema;
pub mod seed;

use chrono::{DateTime, Utc};
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Row,
};

pub use repository::{
    AttendanceRepository, MarksRepository, NoteRepository, SyllabusRepository, UserRepository,
};

/// Storage error type.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// A stored row violates an invariant the API relies on.
    #[error("invalid stored row: {0}")]
    InvalidRow(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StorageError::Conflict(db_err.message().to_string());
            }
        }
        StorageError::Database(err)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Shared connection pool handle.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect eagerly; fails when the server is unreachable.
    pub async fn connect(url: &str, max_connections: u32) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Build a pool that opens connections on first use.
    pub fn connect_lazy(url: &str, max_connections: u32) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Current database server time, used as a liveness probe.
    pub async fn server_time(&self) -> StorageResult<DateTime<Utc>> {
        let row = sqlx::query("select now() as now").fetch_one(&self.pool).await?;
        Ok(row.try_get("now")?)
    }
}
