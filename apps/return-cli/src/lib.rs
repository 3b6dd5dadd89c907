//! # rental-returns
//!
//! Command-line front end for `rental-core`. Loads the business rules,
//! reads return requests as JSON and renders settlements.
//!
//! - [`config`] - Rules loading (defaults, TOML file, environment)
//! - [`commands`] - Subcommand implementations
//! - [`error`] - CLI error type

pub mod commands;
pub mod config;
pub mod error;
