//! Repository layer - Data access abstraction
//!
//! Repositories are bound to the transaction of a unit of work; they
//! never open connections of their own.

pub(crate) mod entities;
mod user_repository;

pub use user_repository::{PgUserRepository, UserRepository};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
