//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Create the schema and bootstrap the admin

pub mod args;

pub use args::{Cli, Commands, ServeArgs};
