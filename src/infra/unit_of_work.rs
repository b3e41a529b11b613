//! Unit of Work pattern implementation.
//!
//! A unit of work owns exactly one database transaction for its whole
//! life and hands out a repository bound to that transaction. It moves
//! from `Open` to either `Committed` or `RolledBack`, and both are final.
//!
//! Services begin a unit through a [`UnitOfWorkFactory`] and always end
//! it with [`settle`], which commits on success and rolls back otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{AccessMode, DatabaseConnection, IsolationLevel, TransactionTrait};

use super::repositories::{PgUserRepository, UserRepository};
use crate::errors::{AppError, AppResult};

/// Lifecycle of a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Open,
    Committed,
    RolledBack,
}

/// One atomic scope of repository operations.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Repository bound to this unit's transaction. Always the same instance.
    fn users(&self) -> &dyn UserRepository;

    /// Commit the transaction.
    ///
    /// Fails with `AlreadyCommitted` or `AlreadyRolledBack` once the unit
    /// has reached a terminal state.
    async fn commit(&mut self) -> AppResult<()>;

    /// Roll the transaction back.
    ///
    /// A second rollback is a no-op; rolling back a committed unit fails
    /// with `AlreadyCommitted`.
    async fn rollback(&mut self) -> AppResult<()>;

    fn state(&self) -> TxState;
}

/// Opens units of work against a shared connection pool.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}

/// Commit `uow` if `outcome` succeeded, roll it back otherwise.
///
/// A failed rollback is logged and the original error is returned.
pub async fn settle<T>(mut uow: Box<dyn UnitOfWork>, outcome: AppResult<T>) -> AppResult<T> {
    match outcome {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = uow.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

/// PostgreSQL unit of work factory.
///
/// Holds a handle to the process pool; every `begin` checks out its own
/// transaction.
#[derive(Clone)]
pub struct PgUnitOfWorkFactory {
    db: Arc<DatabaseConnection>,
}

impl PgUnitOfWorkFactory {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PgUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await?;

        Ok(Box::new(PgUnitOfWork::new(PgUserRepository::new(txn))))
    }
}

/// Unit of work over a sea-orm transaction
pub struct PgUnitOfWork {
    repo: PgUserRepository,
    state: TxState,
}

impl PgUnitOfWork {
    fn new(repo: PgUserRepository) -> Self {
        Self {
            repo,
            state: TxState::Open,
        }
    }

    fn ensure_open(&self) -> AppResult<()> {
        match self.state {
            TxState::Open => Ok(()),
            TxState::Committed => Err(AppError::AlreadyCommitted),
            TxState::RolledBack => Err(AppError::AlreadyRolledBack),
        }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.repo
    }

    async fn commit(&mut self) -> AppResult<()> {
        self.ensure_open()?;
        let txn = self
            .repo
            .take_transaction()
            .ok_or(AppError::TransactionClosed)?;

        // A failed COMMIT leaves nothing to retry; postgres has already
        // discarded the transaction.
        match txn.commit().await {
            Ok(()) => {
                self.state = TxState::Committed;
                Ok(())
            }
            Err(e) => {
                self.state = TxState::RolledBack;
                Err(e.into())
            }
        }
    }

    async fn rollback(&mut self) -> AppResult<()> {
        match self.state {
            TxState::Committed => return Err(AppError::AlreadyCommitted),
            TxState::RolledBack => return Ok(()),
            TxState::Open => {}
        }

        self.state = TxState::RolledBack;
        if let Some(txn) = self.repo.take_transaction() {
            txn.rollback().await?;
        }
        Ok(())
    }

    fn state(&self) -> TxState {
        self.state
    }
}

impl Drop for PgUnitOfWork {
    fn drop(&mut self) {
        if self.state == TxState::Open {
            // sea-orm rolls the transaction back when it is dropped
            tracing::warn!("Unit of work dropped while open, rolling back");
        }
    }
}
