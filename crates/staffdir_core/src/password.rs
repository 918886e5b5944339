//! Credential encoding and verification.
//!
//! # Responsibility
//! - Turn a raw password into the stored credential form.
//! - Compare a supplied password against a stored credential.
//!
//! # Invariants
//! - Encoders never log or echo raw passwords.
//! - `verify` never panics on malformed stored values; it reports mismatch
//!   or an error instead.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure while encoding or parsing a stored credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordError(String);

impl Display for PasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password encoding failed: {}", self.0)
    }
}

impl Error for PasswordError {}

/// Strategy for storing and checking employee credentials.
pub trait PasswordEncoder: Send + Sync {
    /// Encodes `raw` into the form persisted in `Employee::password`.
    fn encode(&self, raw: &str) -> Result<String, PasswordError>;
    /// Returns whether `raw` matches the persisted credential.
    fn verify(&self, raw: &str, stored: &str) -> Result<bool, PasswordError>;
}

/// Stores passwords as given and compares them exactly.
///
/// Kept as the default for compatibility with existing plaintext rows;
/// prefer [`Argon2PasswordEncoder`] for new deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextPasswordEncoder;

impl PasswordEncoder for PlaintextPasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordError> {
        Ok(raw.to_string())
    }

    fn verify(&self, raw: &str, stored: &str) -> Result<bool, PasswordError> {
        Ok(raw == stored)
    }
}

/// Salted argon2 hashes in PHC string format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordError(err.to_string()))
    }

    fn verify(&self, raw: &str, stored: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(stored).map_err(|err| PasswordError(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::{Argon2PasswordEncoder, PasswordEncoder, PlaintextPasswordEncoder};

    #[test]
    fn plaintext_is_exact_match() {
        let encoder = PlaintextPasswordEncoder;
        let stored = encoder.encode("hunter2").unwrap();
        assert_eq!(stored, "hunter2");
        assert!(encoder.verify("hunter2", &stored).unwrap());
        assert!(!encoder.verify("Hunter2", &stored).unwrap());
    }

    #[test]
    fn argon2_hash_is_salted_and_verifies() {
        let encoder = Argon2PasswordEncoder;
        let first = encoder.encode("hunter2").unwrap();
        let second = encoder.encode("hunter2").unwrap();
        assert_ne!(first, "hunter2");
        assert_ne!(first, second);
        assert!(encoder.verify("hunter2", &first).unwrap());
        assert!(!encoder.verify("wrong", &first).unwrap());
    }

    #[test]
    fn argon2_rejects_non_phc_stored_value() {
        let encoder = Argon2PasswordEncoder;
        assert!(encoder.verify("123456", "123456").is_err());
    }
}
