// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Local username/password authentication for the EduOS API.
//!
//! ## Auth Flow
//!
//! 1. Client posts `login_id` + password to `/auth/login`
//! 2. Server verifies the PBKDF2 hash and issues an HS256 token signed with
//!    `JWT_SECRET`
//! 3. Client sends `Authorization: Bearer <token>` on every other call
//! 4. Server verifies signature and expiry, then re-reads the user named by
//!    `sub` so role changes take effect immediately
//!
//! ## Security
//!
//! - Unknown login ids and wrong passwords produce the same response
//! - Password hashes never leave the storage layer
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod roles;
pub mod tokens;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::{Auth, StaffOnly};
pub use roles::{require_roles, Role};
pub use tokens::TokenKeys;
