// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Demo accounts: one faculty member and ten ISE students.
//!
//! Seeding is an upsert, so re-running it resets names, roles and passwords
//! of the seeded login ids.

use super::{repository::NewUser, Database, StorageError, UserRepository};
use crate::{
    auth::{
        password::{hash_password_blocking, PasswordError},
        Role,
    },
    models::{SeedCredential, SeedStudentRange, SeedSummary},
};

pub const FACULTY_LOGIN_ID: &str = "FCLT001";
pub const FACULTY_PASSWORD: &str = "Faculty@123";
pub const STUDENT_PASSWORD: &str = "Student@123";
pub const STUDENT_BRANCH: &str = "Information Science and Engineering (ISE)";
pub const STUDENT_SEMESTER: &str = "3rd Semester";
pub const STUDENT_COUNT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A seed account with its plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub login_id: String,
    pub full_name: String,
    pub role: Role,
    pub password: &'static str,
    pub branch: Option<String>,
    pub semester: Option<String>,
}

fn student_login_id(index: usize) -> String {
    format!("4MH23IS{index:03}")
}

pub fn seed_accounts() -> Vec<SeedAccount> {
    let faculty = SeedAccount {
        login_id: FACULTY_LOGIN_ID.to_string(),
        full_name: "Faculty One".to_string(),
        role: Role::Faculty,
        password: FACULTY_PASSWORD,
        branch: None,
        semester: None,
    };

    let students = (1..=STUDENT_COUNT).map(|index| SeedAccount {
        login_id: student_login_id(index),
        full_name: format!("Student {index:02}"),
        role: Role::Student,
        password: STUDENT_PASSWORD,
        branch: Some(STUDENT_BRANCH.to_string()),
        semester: Some(STUDENT_SEMESTER.to_string()),
    });

    std::iter::once(faculty).chain(students).collect()
}

/// Credentials reported by `POST /auth/seed-users`.
pub fn seed_summary() -> SeedSummary {
    SeedSummary {
        ok: true,
        faculty: SeedCredential {
            login_id: FACULTY_LOGIN_ID.to_string(),
            password: FACULTY_PASSWORD.to_string(),
        },
        students: SeedStudentRange {
            from: student_login_id(1),
            to: student_login_id(STUDENT_COUNT),
            password: STUDENT_PASSWORD.to_string(),
        },
    }
}

/// Upsert every seed account. Returns the number of accounts written.
pub async fn seed_default_users(db: &Database) -> Result<usize, SeedError> {
    let repo = UserRepository::new(db);
    let accounts = seed_accounts();

    for account in &accounts {
        let user = NewUser {
            login_id: account.login_id.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
            password_hash: hash_password_blocking(account.password.to_string()).await?,
            branch: account.branch.clone(),
            semester: account.semester.clone(),
        };
        repo.upsert(&user).await?;
    }

    tracing::info!(accounts = accounts.len(), "Seeded default users");
    Ok(accounts.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_one_faculty_and_ten_students() {
        let accounts = seed_accounts();
        assert_eq!(accounts.len(), 11);

        let faculty = &accounts[0];
        assert_eq!(faculty.login_id, "FCLT001");
        assert_eq!(faculty.role, Role::Faculty);
        assert_eq!(faculty.branch, None);

        let students: Vec<_> = accounts.iter().filter(|a| a.role == Role::Student).collect();
        assert_eq!(students.len(), 10);
        assert_eq!(students[0].login_id, "4MH23IS001");
        assert_eq!(students[0].full_name, "Student 01");
        assert_eq!(students[9].login_id, "4MH23IS010");
        assert_eq!(students[9].full_name, "Student 10");
        assert!(students
            .iter()
            .all(|s| s.semester.as_deref() == Some("3rd Semester")));
    }

    #[test]
    fn summary_matches_seeded_range() {
        let json = serde_json::to_value(seed_summary()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ok": true,
                "faculty": {"login_id": "FCLT001", "password": "Faculty@123"},
                "students": {"from": "4MH23IS001", "to": "4MH23IS010", "password": "Student@123"}
            })
        );
    }
}
