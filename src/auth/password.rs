// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PBKDF2-HMAC-SHA256 password hashing.
//!
//! Hashes use the modular-crypt layout
//! `$pbkdf2-sha256$<rounds>$<salt>$<digest>`, where salt and digest are
//! unpadded base64 with `+` written as `.`. Stored hashes with any round
//! count verify, so accounts created by earlier deployments keep working.

use std::num::NonZeroU32;

use base64ct::{Base64Unpadded, Encoding};
use ring::{
    pbkdf2,
    rand::{SecureRandom, SystemRandom},
};

const SCHEME: &str = "pbkdf2-sha256";
const ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Rounds used for new hashes.
pub const DEFAULT_ROUNDS: u32 = 29_000;
pub const SALT_LEN: usize = 16;
pub const DIGEST_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("system random source unavailable")]
    RandomUnavailable,
    #[error("round count must be positive")]
    InvalidRounds,
    #[error("password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| PasswordError::RandomUnavailable)?;
    hash_password_with(password, &salt, DEFAULT_ROUNDS)
}

/// Hash a password with an explicit salt and round count.
pub fn hash_password_with(password: &str, salt: &[u8], rounds: u32) -> Result<String, PasswordError> {
    let iterations = NonZeroU32::new(rounds).ok_or(PasswordError::InvalidRounds)?;
    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2::derive(ALGORITHM, iterations, salt, password.as_bytes(), &mut digest);

    Ok(format!(
        "${SCHEME}${rounds}${}${}",
        ab64_encode(salt),
        ab64_encode(&digest)
    ))
}

/// Check a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some(parsed) = ParsedHash::parse(stored) else {
        return false;
    };
    pbkdf2::verify(
        ALGORITHM,
        parsed.rounds,
        &parsed.salt,
        password.as_bytes(),
        &parsed.digest,
    )
    .is_ok()
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_blocking(password: String, stored: String) -> Result<bool, PasswordError> {
    Ok(tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await?)
}

struct ParsedHash {
    rounds: NonZeroU32,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl ParsedHash {
    fn parse(stored: &str) -> Option<Self> {
        let mut parts = stored.strip_prefix('$')?.split('$');
        if parts.next()? != SCHEME {
            return None;
        }
        let rounds = NonZeroU32::new(parts.next()?.parse().ok()?)?;
        let salt = ab64_decode(parts.next()?)?;
        let digest = ab64_decode(parts.next()?)?;
        if parts.next().is_some() || digest.is_empty() {
            return None;
        }
        Some(Self { rounds, salt, digest })
    }
}

fn ab64_encode(bytes: &[u8]) -> String {
    Base64Unpadded::encode_string(bytes).replace('+', ".")
}

fn ab64_decode(encoded: &str) -> Option<Vec<u8>> {
    let standard = encoded.trim_end_matches('=').replace('.', "+");
    Base64Unpadded::decode_vec(&standard).ok()
}
