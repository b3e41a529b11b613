//! Argon2id password hashing.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::config::{DEFAULT_ARGON2_TIME_COST, MAX_ARGON2_TIME_COST, MIN_ARGON2_TIME_COST};
use crate::domain::password::{check_plaintext, PasswordError, PasswordHasher};

/// Argon2id implementation of [`PasswordHasher`].
///
/// Applies the same input limits as bcrypt so callers see one contract.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher; a time cost outside 1..=10 falls back to the default.
    pub fn new(time_cost: u32) -> Self {
        let time_cost = if (MIN_ARGON2_TIME_COST..=MAX_ARGON2_TIME_COST).contains(&time_cost) {
            time_cost
        } else {
            tracing::warn!(
                time_cost,
                default = DEFAULT_ARGON2_TIME_COST,
                "argon2 time cost out of range, using default"
            );
            DEFAULT_ARGON2_TIME_COST
        };

        let params = Params::new(
            Params::DEFAULT_M_COST,
            time_cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .unwrap_or_default();

        Self { params }
    }

    pub fn time_cost(&self) -> u32 {
        self.params.t_cost()
    }

    #[inline]
    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new(DEFAULT_ARGON2_TIME_COST)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        check_plaintext(plain)?;

        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    fn verify(&self, hash: &str, plain: &str) -> Result<(), PasswordError> {
        if hash.is_empty() {
            return Err(PasswordError::HashEmpty);
        }
        check_plaintext(plain)?;

        let parsed =
            PasswordHash::new(hash).map_err(|e| PasswordError::Verification(e.to_string()))?;
        // A PHC string may parse without carrying any hash output
        if parsed.hash.is_none() {
            return Err(PasswordError::Verification(
                "stored hash has no output".to_string(),
            ));
        }

        // Parameters are read from the stored hash, not from self
        match self.argon2().verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(HashError::Password) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::Verification(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Argon2Hasher {
        Argon2Hasher::new(MIN_ARGON2_TIME_COST)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast();
        let hash = hasher.hash("SecurePassword123!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "SecurePassword123!").is_ok());
    }

    #[test]
    fn test_mismatch() {
        let hasher = fast();
        let hash = hasher.hash("SecurePassword123!").unwrap();
        assert_eq!(
            hasher.verify(&hash, "WrongPassword123"),
            Err(PasswordError::Mismatch)
        );
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            fast().verify("$argon2id$broken", "whatever"),
            Err(PasswordError::Verification(_))
        ));
        assert!(matches!(
            fast().verify("not a phc string", "whatever"),
            Err(PasswordError::Verification(_))
        ));
    }

    #[test]
    fn test_truncated_hash_is_not_a_mismatch() {
        let hasher = fast();
        let hash = hasher.hash("SecurePassword123!").unwrap();
        // Drop the salt and hash segments, keep the parameters
        let truncated = hash.rsplitn(3, '$').last().unwrap();

        assert!(matches!(
            hasher.verify(truncated, "SecurePassword123!"),
            Err(PasswordError::Verification(_))
        ));
    }

    #[test]
    fn test_limits_shared_with_bcrypt() {
        let hasher = fast();
        assert_eq!(hasher.hash(""), Err(PasswordError::EmptyPassword));
        assert_eq!(
            hasher.hash(&"p".repeat(73)),
            Err(PasswordError::PasswordTooLong)
        );
        assert_eq!(hasher.verify("", "secret"), Err(PasswordError::HashEmpty));
    }

    #[test]
    fn test_time_cost_clamped() {
        assert_eq!(Argon2Hasher::new(0).time_cost(), DEFAULT_ARGON2_TIME_COST);
        assert_eq!(Argon2Hasher::new(99).time_cost(), DEFAULT_ARGON2_TIME_COST);
        assert_eq!(Argon2Hasher::new(3).time_cost(), 3);
    }
}
