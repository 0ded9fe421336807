/*
[INPUT]:  Plaintext passwords and stored bcrypt hashes
[OUTPUT]: Password hashes, verification results, rule violations
[POS]:    Auth layer - password hashing
[UPDATE]: When password rules or hashing cost change
*/

use tracing::warn;

use crate::http::{CarpoolError, Result};

pub const DEFAULT_BCRYPT_COST: u32 = 12;
pub const MIN_PASSWORD_LEN: usize = 8;
/// bcrypt ignores input past this many bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(CarpoolError::Validation("password is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CarpoolError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(CarpoolError::Validation(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Hash on the blocking pool; bcrypt is deliberately slow
pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| CarpoolError::Task(e.to_string()))?
        .map_err(CarpoolError::from)
}

/// A stored hash that bcrypt cannot parse never matches
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| CarpoolError::Task(e.to_string()))?;

    match outcome {
        Ok(matches) => Ok(matches),
        Err(err) => {
            warn!(error = %err, "stored password hash is unusable");
            Ok(false)
        }
    }
}
