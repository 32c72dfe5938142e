// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reference material pulled from the syllabus and notes tables for
//! question-paper generation.

use crate::storage::{
    repository::{NoteReference, SyllabusReference},
    Database, NoteRepository, StorageResult, SyllabusRepository,
};

use super::prompt::SearchState;

const SYLLABUS_LIMIT: i64 = 3;
const NOTES_LIMIT: i64 = 8;

/// Collapse runs of whitespace and cap the text at `limit` characters,
/// appending `...` when something was cut.
pub fn clip_text(value: Option<&str>, limit: usize) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let compact = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() <= limit {
        return compact;
    }
    let head: String = compact.chars().take(limit).collect();
    format!("{}...", head.trim_end())
}

fn or_default(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// Render the reference block that gets appended to QP prompts.
pub fn format_reference_context(
    branch: &str,
    semester: &str,
    subject: &str,
    syllabus: &[SyllabusReference],
    notes: &[NoteReference],
) -> String {
    let subject_focus = if subject.is_empty() {
        "not specified"
    } else {
        subject
    };
    let mut lines = vec![
        format!("Branch: {branch}"),
        format!("Semester: {semester}"),
        format!("Subject focus: {subject_focus}"),
    ];

    if syllabus.is_empty() {
        lines.push("Syllabus references: none found.".to_string());
    } else {
        lines.push("Syllabus references:".to_string());
        for (idx, row) in syllabus.iter().enumerate() {
            let name = or_default(clip_text(Some(&row.subject), 100), "N/A");
            let code = clip_text(row.subject_code.as_deref(), 60);
            let file = or_default(clip_text(row.file_name.as_deref(), 120), "N/A");
            let content = clip_text(row.content.as_deref(), 700);
            let code_suffix = if code.is_empty() {
                String::new()
            } else {
                format!(" ({code})")
            };
            lines.push(format!("- S{}: {name}{code_suffix}; file: {file}", idx + 1));
            if !content.is_empty() {
                lines.push(format!("  Topics: {content}"));
            }
        }
    }

    if notes.is_empty() {
        lines.push("Notes references: none found.".to_string());
    } else {
        lines.push("Notes references:".to_string());
        for (idx, row) in notes.iter().enumerate() {
            let title = or_default(clip_text(Some(&row.title), 120), "Untitled");
            let subject = or_default(clip_text(Some(&row.subject), 100), "N/A");
            let file = or_default(clip_text(Some(&row.file_name), 120), "N/A");
            let scheme = clip_text(row.scheme.as_deref(), 60);
            let scheme_suffix = if scheme.is_empty() {
                String::new()
            } else {
                format!("; scheme: {scheme}")
            };
            lines.push(format!(
                "- N{}: {title} | subject: {subject} | file: {file}{scheme_suffix}",
                idx + 1
            ));
        }
    }

    lines.join("\n")
}

/// Load syllabus and notes references for the search panel's branch and
/// semester. Never fails; a database error is reported inline.
pub async fn build_reference_context(db: &Database, search: &SearchState) -> String {
    let branch = search.branch.trim();
    let semester = search.semester.trim();
    let subject = search.subject.trim();

    match load_references(db, branch, semester, subject).await {
        Ok((syllabus, notes)) => {
            tracing::debug!(
                syllabus = syllabus.len(),
                notes = notes.len(),
                "Loaded QP reference context"
            );
            format_reference_context(branch, semester, subject, &syllabus, &notes)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load QP reference context");
            format!("Could not load syllabus/notes context from DB: {e}")
        }
    }
}

/// Subject-specific rows first; falls back to the whole branch and semester
/// when a subject was given but matched nothing.
async fn load_references(
    db: &Database,
    branch: &str,
    semester: &str,
    subject: &str,
) -> StorageResult<(Vec<SyllabusReference>, Vec<NoteReference>)> {
    let subject = (!subject.is_empty()).then_some(subject);

    let syllabus_repo = SyllabusRepository::new(db);
    let mut syllabus = syllabus_repo
        .recent_for_context(branch, semester, subject, SYLLABUS_LIMIT)
        .await?;
    if syllabus.is_empty() && subject.is_some() {
        syllabus = syllabus_repo
            .recent_for_context(branch, semester, None, SYLLABUS_LIMIT)
            .await?;
    }

    let notes_repo = NoteRepository::new(db);
    let mut notes = notes_repo
        .recent_for_context(branch, semester, subject, NOTES_LIMIT)
        .await?;
    if notes.is_empty() && subject.is_some() {
        notes = notes_repo
            .recent_for_context(branch, semester, None, NOTES_LIMIT)
            .await?;
    }

    Ok((syllabus, notes))
}
