//! Signed identity assertions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{User, UserRole};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject, always the user id
    pub sub: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
}

/// Issues and validates signed, time-bounded tokens.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenService: Send + Sync {
    /// Mint a token asserting the identity and role of `user`
    fn generate_token(&self, user: &User) -> AppResult<String>;

    /// Verify signature, algorithm and validity window.
    ///
    /// Every rejection surfaces as `AppError::InvalidToken`.
    fn validate_token(&self, token: &str) -> AppResult<TokenClaims>;
}
