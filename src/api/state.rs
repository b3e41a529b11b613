//! Application state shared by every handler.

use std::sync::Arc;

use crate::domain::TokenService;
use crate::infra::Database;
use crate::services::{AuthService, UserService};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Validates bearer tokens in the auth middleware
    pub token_service: Arc<dyn TokenService>,
    /// Database handle for health checks; absent when serving without one
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        token_service: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            token_service,
            database: None,
        }
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }
}
