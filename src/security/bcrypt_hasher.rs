//! bcrypt password hashing.

use crate::config::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::domain::password::{check_plaintext, PasswordError, PasswordHasher};

/// bcrypt implementation of [`PasswordHasher`].
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher; a cost outside 4..=31 falls back to the default.
    pub fn new(cost: u32) -> Self {
        let cost = if (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            cost
        } else {
            tracing::warn!(
                cost,
                default = DEFAULT_BCRYPT_COST,
                "bcrypt cost out of range, using default"
            );
            DEFAULT_BCRYPT_COST
        };

        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        check_plaintext(plain)?;
        bcrypt::hash(plain, self.cost).map_err(|e| PasswordError::Hash(e.to_string()))
    }

    fn verify(&self, hash: &str, plain: &str) -> Result<(), PasswordError> {
        if hash.is_empty() {
            return Err(PasswordError::HashEmpty);
        }
        check_plaintext(plain)?;

        match bcrypt::verify(plain, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::Verification(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> BcryptHasher {
        BcryptHasher::new(MIN_BCRYPT_COST)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast();
        for plain in ["a", "SecurePass123!", &"x".repeat(72)] {
            let hash = hasher.hash(plain).unwrap();
            assert_ne!(hash, plain);
            assert!(hasher.verify(&hash, plain).is_ok());
        }
    }

    #[test]
    fn test_mismatch_is_distinct() {
        let hasher = fast();
        let hash = hasher.hash("Correct#Horse1").unwrap();
        assert_eq!(
            hasher.verify(&hash, "Wrong#Horse1"),
            Err(PasswordError::Mismatch)
        );
    }

    #[test]
    fn test_corrupt_hash_is_verification_error() {
        let result = fast().verify("not-a-bcrypt-hash", "whatever");
        assert!(matches!(result, Err(PasswordError::Verification(_))));
    }

    #[test]
    fn test_empty_inputs() {
        let hasher = fast();
        assert_eq!(hasher.hash(""), Err(PasswordError::EmptyPassword));
        assert_eq!(hasher.verify("", "secret"), Err(PasswordError::HashEmpty));
    }

    #[test]
    fn test_too_long_rejected() {
        assert_eq!(
            fast().hash(&"x".repeat(73)),
            Err(PasswordError::PasswordTooLong)
        );
    }

    #[test]
    fn test_cost_clamped() {
        assert_eq!(BcryptHasher::new(2).cost(), DEFAULT_BCRYPT_COST);
        assert_eq!(BcryptHasher::new(40).cost(), DEFAULT_BCRYPT_COST);
        assert_eq!(BcryptHasher::new(10).cost(), 10);
    }

    #[test]
    fn test_salted() {
        let hasher = fast();
        let first = hasher.hash("SamePassword1!").unwrap();
        let second = hasher.hash("SamePassword1!").unwrap();
        assert_ne!(first, second);
    }
}
