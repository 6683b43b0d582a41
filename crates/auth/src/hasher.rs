//! One-way password hashing.
//!
//! Argon2id with a random per-call salt, serialized as a PHC string. The
//! work factor is the point: it is what slows brute force down.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::AuthError;

/// Hash a plaintext password.
///
/// Two calls with the same input produce different digests (random salt);
/// both verify against the original plaintext.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| AuthError::internal(format!("salt generation failed: {e}")))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AuthError::internal(format!("salt encoding failed: {e}")))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))?
        .to_string();

    Ok(phc)
}

/// Check a plaintext against a stored digest.
///
/// Total: malformed digests are simply "no match", never an error.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
