// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EduOS Server - Campus Records & AI Teaching Assistant
//!
//! This crate provides the HTTP backend for a single institution's students,
//! faculty and heads of department: bearer-token authentication, role-scoped
//! CRUD over academic records, and a thin proxy to an OpenAI-compatible
//! chat-completions provider for lesson plans and question papers.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, HS256 tokens, role gate and extractors
//! - `ai` - Prompt templates, reference context and diagram guarantee
//! - `providers` - External LLM provider client (Groq)
//! - `storage` - PostgreSQL pool, schema, seed data and repositories

pub mod ai;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod state;
pub mod storage;
pub mod telemetry;
