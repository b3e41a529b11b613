//! Authentication service - Handles user authentication.
//!
//! Both entry points run their lookups inside a unit of work and check,
//! in order: the credential or token, then the email validation flag,
//! then the account status. A token is only minted after every check.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::{PasswordError, PasswordHasher, TokenService, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{settle, UnitOfWorkFactory, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Token plus the authenticated user, password stripped
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check email and password and issue a token
    async fn login(&self, email: &str, password: &str) -> AppResult<AuthResponse>;

    /// Exchange a still-valid token for a fresh one
    async fn sign_in_with_token(&self, token: &str) -> AppResult<AuthResponse>;
}

/// Concrete implementation of AuthService over a unit of work factory.
pub struct Authenticator {
    factory: Arc<dyn UnitOfWorkFactory>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl Authenticator {
    pub fn new(
        factory: Arc<dyn UnitOfWorkFactory>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            factory,
            hasher,
            tokens,
        }
    }

    async fn authenticate(
        &self,
        users: &dyn UserRepository,
        email: &str,
        password: &str,
    ) -> AppResult<AuthResponse> {
        let user = users.find_by_email(email).await.map_err(|e| match e {
            AppError::NoRows => AppError::InvalidCredentials,
            other => other,
        })?;

        let hash = user
            .password
            .as_deref()
            .ok_or(AppError::InvalidCredentials)?;

        self.hasher.verify(hash, password).map_err(|e| match e {
            PasswordError::HashEmpty => AppError::InvalidCredentials,
            PasswordError::Mismatch => AppError::PasswordIncorrect,
            other => {
                tracing::warn!(user_id = %user.id, "Password verification error: {}", other);
                AppError::PasswordIncorrect
            }
        })?;

        self.issue(user)
    }

    async fn renew(&self, users: &dyn UserRepository, email: &str) -> AppResult<AuthResponse> {
        let user = users.find_by_email(email).await.map_err(|e| match e {
            AppError::NoRows => AppError::UserNotFoundForToken,
            other => other,
        })?;

        self.issue(user)
    }

    /// Account checks shared by both flows, then mint the token
    fn issue(&self, user: User) -> AppResult<AuthResponse> {
        if !user.email_validated {
            return Err(AppError::EmailNotValidated);
        }
        if !user.status {
            return Err(AppError::AccountDisabled);
        }

        let token = self.tokens.generate_token(&user)?;

        Ok(AuthResponse {
            token,
            user: user.without_password(),
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, email: &str, password: &str) -> AppResult<AuthResponse> {
        let uow = self.factory.begin().await?;
        let outcome = self.authenticate(uow.users(), email, password).await;
        let response = settle(uow, outcome).await?;

        tracing::info!(user_id = %response.user.id, "User logged in");
        Ok(response)
    }

    async fn sign_in_with_token(&self, token: &str) -> AppResult<AuthResponse> {
        // Rejected tokens never reach the database
        let claims = self.tokens.validate_token(token)?;

        let uow = self.factory.begin().await?;
        let outcome = self.renew(uow.users(), &claims.email).await;
        settle(uow, outcome).await
    }
}
