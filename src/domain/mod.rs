//! Domain layer - Core business entities and contracts
//!
//! This module contains the user model and the capability contracts
//! (password hashing, token issuance) the services depend on.

pub mod password;
pub mod token;
pub mod user;

pub use password::{PasswordError, PasswordHasher, MAX_PASSWORD_BYTES};
pub use token::{TokenClaims, TokenService};
pub use user::{AdminBootstrap, CreateUser, NewUser, UpdateUser, User, UserChanges, UserRole};

#[cfg(any(test, feature = "test-utils"))]
pub use password::MockPasswordHasher;
#[cfg(any(test, feature = "test-utils"))]
pub use token::MockTokenService;
