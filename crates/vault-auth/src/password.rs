//! Credential hashing for the user registry.
//!
//! Registration stores an Argon2id hash with a per-account random salt;
//! login re-derives and compares. Hashes are PHC strings, so the cost
//! parameters travel with each stored hash and can be raised later without
//! invalidating existing accounts.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

use vault_core::error::AppError;
use vault_core::result::AppResult;

/// Hash a plaintext password for storage in the registry.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check a login attempt against a stored hash.
///
/// A mismatch is an expected outcome (`Ok(false)`). A stored hash that no
/// longer parses is corrupt registry state and surfaces as an integrity
/// error, never as a plain login failure.
pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        AppError::integrity(format!("Stored password hash is not a valid PHC string: {e}"))
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::internal(format!(
            "Password verification failed: {e}"
        ))),
    }
}
