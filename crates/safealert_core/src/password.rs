//! Password hashing for account credentials.
//!
//! # Invariants
//! - Only Argon2id PHC strings with a per-user random salt are persisted.
//! - Verification goes through `argon2`'s constant-time comparison.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;
use rand_core::OsRng;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hash of a throwaway secret, verified against when an email is unknown so
/// both login failure paths cost one Argon2 run.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("safealert-unknown-account").ok());

/// Failure from the hashing backend or a corrupt stored hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordHashError {
    Hash(String),
    /// Stored value is not a valid PHC string.
    InvalidStoredHash(String),
    Verify(String),
}

impl Display for PasswordHashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash(message) => write!(f, "password hashing failed: {message}"),
            Self::InvalidStoredHash(message) => {
                write!(f, "stored password hash is invalid: {message}")
            }
            Self::Verify(message) => write!(f, "password verification failed: {message}"),
        }
    }
}

impl Error for PasswordHashError {}

/// Hashes `password` with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::Hash(err.to_string()))
}

/// Checks `password` against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash or the
/// backend is broken.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| PasswordHashError::InvalidStoredHash(err.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::Verify(err.to_string())),
    }
}

/// Burns one verification against `DUMMY_HASH`; the result is discarded.
pub(crate) fn verify_against_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password, PasswordHashError};

    #[test]
    fn hash_is_salted_phc_string_and_verifies() {
        let first = hash_password("pw").unwrap();
        let second = hash_password("pw").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second, "salts must differ between hashes");
        assert!(verify_password("pw", &first).unwrap());
        assert!(verify_password("pw", &second).unwrap());
    }

    #[test]
    fn verify_is_case_sensitive_and_rejects_mismatch() {
        let hash = hash_password("Secret").unwrap();
        assert!(!verify_password("secret", &hash).unwrap());
        assert!(!verify_password("Secret ", &hash).unwrap());
    }

    #[test]
    fn verify_reports_corrupt_stored_hash() {
        let err = verify_password("pw", "plaintext-pw").unwrap_err();
        assert!(matches!(err, PasswordHashError::InvalidStoredHash(_)));
    }
}
