//! Infrastructure layer - External systems integration
//!
//! Database connection, the transaction-scoped repository and the
//! Unit of Work that binds them together.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::Database;
pub use repositories::{PgUserRepository, UserRepository};
pub use unit_of_work::{
    settle, PgUnitOfWork, PgUnitOfWorkFactory, TxState, UnitOfWork, UnitOfWorkFactory,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
