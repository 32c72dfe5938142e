// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! External service providers.

pub mod groq;

pub use groq::{ChatMessage, ChatRole, GroqClient, GroqError};
