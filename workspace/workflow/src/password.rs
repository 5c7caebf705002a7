//! Argon2 password hashing.
//!
//! Hashing and verification are CPU-bound, so both run on the blocking
//! thread pool instead of a runtime worker.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::warn;

use crate::error::{Result, WorkflowError};

fn hash_blocking(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| WorkflowError::PasswordHash(e.to_string()))
}

// A malformed stored hash never verifies
fn verify_blocking(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Hashes a plain password into a PHC string.
pub async fn hash_password(plain: &str) -> Result<String> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || hash_blocking(&plain))
        .await
        .map_err(|e| {
            warn!(error = %e, "Password hashing task panicked");
            WorkflowError::PasswordHash(e.to_string())
        })?
}

/// Checks a plain password against a stored PHC string.
pub async fn verify_password(plain: &str, stored: &str) -> Result<bool> {
    let plain = plain.to_owned();
    let stored = stored.to_owned();
    tokio::task::spawn_blocking(move || verify_blocking(&plain, &stored))
        .await
        .map_err(|e| {
            warn!(error = %e, "Password verification task panicked");
            WorkflowError::PasswordHash(e.to_string())
        })
}
