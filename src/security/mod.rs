//! Concrete credential and token implementations.

mod argon2_hasher;
mod bcrypt_hasher;
mod jwt_service;

use std::sync::Arc;

pub use argon2_hasher::Argon2Hasher;
pub use bcrypt_hasher::BcryptHasher;
pub use jwt_service::JwtTokenService;

use crate::config::{Config, HasherKind};
use crate::domain::PasswordHasher;

/// Pick the configured password hasher
pub fn password_hasher(config: &Config) -> Arc<dyn PasswordHasher> {
    match config.hasher {
        HasherKind::Bcrypt => Arc::new(BcryptHasher::new(config.bcrypt_cost)),
        HasherKind::Argon2 => Arc::new(Argon2Hasher::new(config.argon2_time_cost)),
    }
}
