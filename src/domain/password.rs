//! Password hashing contract.
//!
//! The domain only knows the capability; concrete algorithms live in
//! `crate::security`.

use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Longest plaintext accepted by any hasher, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Failures raised while hashing or verifying a credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Password cannot exceed 72 bytes")]
    PasswordTooLong,

    #[error("Password hash cannot be empty")]
    HashEmpty,

    #[error("Incorrect password")]
    Mismatch,

    #[error("Password verification failed: {0}")]
    Verification(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

impl PasswordError {
    /// Errors caused by the caller's input rather than the algorithm
    pub fn is_input_error(&self) -> bool {
        matches!(self, PasswordError::EmptyPassword | PasswordError::PasswordTooLong)
    }
}

/// One-way credential hashing.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password
    fn hash(&self, plain: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `PasswordError::Mismatch` when the hash is well formed but
    /// belongs to another password.
    fn verify(&self, hash: &str, plain: &str) -> Result<(), PasswordError>;
}

/// Input checks shared by every hasher, run before any hashing work.
pub fn check_plaintext(plain: &str) -> Result<(), PasswordError> {
    if plain.is_empty() {
        return Err(PasswordError::EmptyPassword);
    }
    if plain.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::PasswordTooLong);
    }
    Ok(())
}
