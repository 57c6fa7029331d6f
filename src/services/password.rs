//! Password hashing
//!
//! bcrypt is CPU-bound, so both hashing and verification run on the
//! blocking thread pool.

use crate::utils::errors::{StudioError, Result};

/// Hash a password with a fresh salt
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| StudioError::Internal(format!("Task join error: {}", e)))?
        .map_err(StudioError::from)
}

/// Verify a password against a stored hash.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();

    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| StudioError::Internal(format!("Task join error: {}", e)))?;

    match verified {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be verified");
            Ok(false)
        }
    }
}
