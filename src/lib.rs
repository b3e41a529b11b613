//! Admin API - user administration backend
//!
//! Authentication and user management over PostgreSQL, with every
//! service call running inside its own unit of work.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: User model and the hashing/token contracts
//! - **security**: bcrypt/argon2 hashers and the RS256 token service
//! - **services**: Authentication, user management and startup migration
//! - **infra**: Database, unit of work and the transaction-scoped repository
//! - **jobs**: Outbound email delivery and templates
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Create the schema and the initial admin
//! cargo run -- migrate
//!
//! # Start the server
//! cargo run -- serve --port 8080
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod security;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{User, UserRole};
pub use errors::{AppError, AppResult};
