// ============================
// userservice-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};

use crate::config::HashSettings;
use crate::error::AppError;

/// Hash a password using scrypt with a fresh random salt.
///
/// The result is a PHC string that records the cost parameters, so hashes made
/// under older settings keep verifying after the settings change.
pub fn hash_password(plain: &str, settings: &HashSettings) -> Result<String, AppError> {
    let params = settings
        .params()
        .map_err(|e| AppError::Hashing(e.to_string()))?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
        .map_err(|e| AppError::Hashing(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}
