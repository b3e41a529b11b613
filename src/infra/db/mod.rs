//! Database connection management.
//!
//! The pool is built once by the process bootstrap and passed down; the
//! unit of work factory shares the handle, never the pool.

use std::sync::Arc;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, Statement,
};

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: Arc<DatabaseConnection>,
}

impl Database {
    /// Open the connection pool and verify it answers.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options.sqlx_logging(false);

        let connection = SeaDatabase::connect(options)
            .await
            .map_err(|e| AppError::config(format!("Failed to connect to database: {}", e)))?;

        let db = Self {
            connection: Arc::new(connection),
        };
        db.ping().await?;

        tracing::info!("Database connected");
        Ok(db)
    }

    /// Shared handle to the pool.
    pub fn get_connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.connection)
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> AppResult<()> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }

    /// Close the pool.
    ///
    /// Only the last holder can close it explicitly; otherwise the pool
    /// is released when the remaining handles drop.
    pub async fn close(self) -> AppResult<()> {
        match Arc::try_unwrap(self.connection) {
            Ok(connection) => connection.close().await?,
            Err(shared) => tracing::debug!(
                handles = Arc::strong_count(&shared),
                "Pool still shared, closing on drop"
            ),
        }
        Ok(())
    }
}
