use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

use rand_core::OsRng;

use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// `Ok(false)` on a wrong password; `Err` only if the stored hash is unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid stored hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Checks `password` against the account's hash, or against a throwaway hash
/// when there is no account, so both cases cost one Argon2 verification.
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> Result<bool, AppError> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            let dummy = DUMMY_HASH.get_or_init(|| hash_password("no-such-account").ok());
            if let Some(dummy) = dummy {
                verify_password(password, dummy)?;
            }
            Ok(false)
        }
    }
}
