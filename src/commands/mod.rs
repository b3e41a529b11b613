//! Commands module - CLI command implementations.
//!
//! Both commands share the same wiring: one connection pool, one unit of
//! work factory over it, and the user service built on top.

pub mod migrate;
pub mod serve;

use std::sync::Arc;

use crate::config::Config;
use crate::domain::PasswordHasher;
use crate::errors::AppResult;
use crate::infra::{Database, PgUnitOfWorkFactory, UnitOfWorkFactory};
use crate::security;
use crate::services::{MigrationService, UserManager};

/// Core services shared by every command
pub(crate) struct Core {
    pub database: Database,
    pub factory: Arc<dyn UnitOfWorkFactory>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl Core {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let database = Database::connect(config).await?;
        let factory: Arc<dyn UnitOfWorkFactory> =
            Arc::new(PgUnitOfWorkFactory::new(database.get_connection()));

        Ok(Self {
            database,
            factory,
            hasher: security::password_hasher(config),
        })
    }

    /// Release the factory's handle, then close the pool
    pub async fn close(self) -> AppResult<()> {
        drop(self.factory);
        self.database.close().await
    }

    /// Schema first, then the admin account
    pub async fn migrate(&self, users: Arc<UserManager>, config: &Config) -> AppResult<()> {
        MigrationService::new(self.factory.clone(), users, config.admin.clone())
            .run()
            .await
    }
}
