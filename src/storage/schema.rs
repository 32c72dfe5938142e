// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Idempotent schema setup, run on every start.

use super::{Database, StorageResult};

/// DDL applied in order. Every statement is safe to re-run.
pub const SCHEMA_STATEMENTS: [&str; 10] = [
    "create extension if not exists pgcrypto",
    "create table if not exists users (
        id uuid primary key default gen_random_uuid(),
        login_id text unique not null,
        full_name text not null,
        role text not null check (role in ('student','faculty','hod')),
        password_hash text not null,
        branch text,
        semester text,
        created_at timestamptz default now()
    )",
    "create table if not exists attendance (
        id bigserial primary key,
        student_id uuid not null references users(id) on delete cascade,
        subject text not null,
        date_range text not null,
        classes_conducted int not null,
        classes_attended int not null,
        created_by uuid references users(id),
        created_at timestamptz default now()
    )",
    "create table if not exists marks (
        id bigserial primary key,
        student_id uuid not null references users(id) on delete cascade,
        subject text not null,
        internal1 int,
        internal2 int,
        internal3 int,
        created_by uuid references users(id),
        created_at timestamptz default now()
    )",
    "create table if not exists syllabus (
        id bigserial primary key,
        branch text not null,
        semester text not null,
        subject text not null,
        subject_code text,
        content text,
        file_name text,
        file_data text,
        file_type text,
        created_by uuid references users(id),
        created_at timestamptz default now()
    )",
    "create table if not exists notes (
        id bigserial primary key,
        title text not null,
        subject text not null,
        branch text not null,
        semester text not null,
        scheme text,
        file_name text not null,
        file_data text not null,
        file_type text,
        uploaded_by uuid references users(id),
        created_at timestamptz default now()
    )",
    // Columns added after the first notes release.
    "alter table notes add column if not exists scheme text",
    "alter table notes add column if not exists file_type text",
    "alter table notes add column if not exists uploaded_by uuid references users(id)",
    "alter table notes add column if not exists created_at timestamptz default now()",
];

/// Create missing tables and columns.
pub async fn ensure_schema(db: &Database) -> StorageResult<()> {
    for (index, statement) in SCHEMA_STATEMENTS.iter().enumerate() {
        sqlx::query(statement).execute(db.pool()).await?;
        tracing::debug!(step = index + 1, total = SCHEMA_STATEMENTS.len(), "Applied schema statement");
    }
    tracing::info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_statement_is_idempotent() {
        for statement in SCHEMA_STATEMENTS {
            assert!(
                statement.contains("if not exists"),
                "statement is not re-runnable: {statement}"
            );
        }
    }

    #[test]
    fn users_table_is_created_before_referencing_tables() {
        let position = |needle: &str| {
            SCHEMA_STATEMENTS
                .iter()
                .position(|s| s.contains(needle))
                .unwrap()
        };
        let users = position("create table if not exists users");
        for table in ["attendance", "marks", "syllabus", "notes"] {
            assert!(users < position(&format!("create table if not exists {table}")));
        }
    }
}
