//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP or HTTPS server
//! - `migrate` - Database migrations

pub mod args;

pub use args::{Cli, Commands};
