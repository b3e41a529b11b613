//! Startup schema migration and admin bootstrap.

use std::sync::Arc;

use super::UserService;
use crate::domain::AdminBootstrap;
use crate::errors::AppResult;
use crate::infra::{settle, UnitOfWorkFactory};

/// Brings the schema up to date, then makes sure the initial admin exists.
pub struct MigrationService {
    factory: Arc<dyn UnitOfWorkFactory>,
    users: Arc<dyn UserService>,
    admin: Option<AdminBootstrap>,
}

impl MigrationService {
    pub fn new(
        factory: Arc<dyn UnitOfWorkFactory>,
        users: Arc<dyn UserService>,
        admin: Option<AdminBootstrap>,
    ) -> Self {
        Self {
            factory,
            users,
            admin,
        }
    }

    /// Any failure here should stop the process.
    pub async fn run(&self) -> AppResult<()> {
        let uow = self.factory.begin().await?;
        let outcome = uow.users().migrate().await;
        settle(uow, outcome).await?;
        tracing::info!("Database schema is up to date");

        match &self.admin {
            Some(admin) => self.users.create_initial_admin(admin).await?,
            None => tracing::warn!("ADMIN_EMAIL not set, skipping initial admin"),
        }

        Ok(())
    }
}
