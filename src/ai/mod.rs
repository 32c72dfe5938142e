// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Teaching-assistant features built on the Groq provider.
//!
//! - `prompt`: templates for lesson plans, question papers, quizzes and chat
//! - `context`: syllabus and notes references loaded from the database
//! - `diagram`: post-processing for generated question papers

pub mod context;
pub mod diagram;
pub mod prompt;

pub use context::build_reference_context;
pub use diagram::ensure_diagram;
pub use prompt::{AiTask, QpType, SearchState};

/// Completion budget for faculty tasks.
pub const TASK_MAX_TOKENS: u32 = 4096;
/// Completion budget for chat and the syllabus/notes lookups.
pub const CHAT_MAX_TOKENS: u32 = 2048;

pub const TASK_FALLBACK: &str = "Could not process task.";
pub const CHAT_FALLBACK: &str = "The expert terminal is currently recalibrating.";
pub const SYLLABUS_FALLBACK: &str = "No syllabus found.";
pub const NOTES_FALLBACK: &str = "No specific PDF notes indexed. Try refining the subject name.";
