//! Migrate command - Schema creation and admin bootstrap.

use std::sync::Arc;

use super::Core;
use crate::config::Config;
use crate::errors::AppResult;
use crate::services::UserManager;

/// Execute the migrate command
pub async fn execute(config: Config) -> AppResult<()> {
    tracing::info!("Running migrations...");

    let core = Core::connect(&config).await?;
    let users = Arc::new(UserManager::new(core.factory.clone(), core.hasher.clone()));

    core.migrate(users, &config).await?;
    core.close().await?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}
