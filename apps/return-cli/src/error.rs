//! # CLI Error Type
//!
//! Everything that can stop a `rental-returns` invocation.
//!
//! ```text
//! CoreError (rental-core) ──┐
//! io::Error ────────────────┤
//! serde_json::Error ────────┼──► CliError ──► "error: ..." on stderr, exit 1
//! toml de/ser errors ───────┤
//! bad config / request ─────┘
//! ```

use rental_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Settlement rejected by the core (invalid input, overflow, bad rules).
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid rules file: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to serialize rules: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type CliResult<T> = Result<T, CliError>;
