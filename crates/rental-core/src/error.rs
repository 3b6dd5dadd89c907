//! # Error Types
//!
//! Domain-specific error types for rental-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rental-core errors (this file)                                         │
//! │  ├── CoreError        - Settlement / batch failures                     │
//! │  └── ValidationError  - Precondition failures on inputs                 │
//! │                                                                         │
//! │  rental-returns CLI errors (separate crate)                             │
//! │  └── CliError         - Config, I/O and JSON failures                   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError::InvalidInput → CliError → stderr    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No error here is retryable: the calculator performs no I/O, so a rejected
//! input stays rejected until the caller changes it.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Return settlement errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Inputs violated a precondition. Raised before any arithmetic runs.
    ///
    /// ## User Workflow
    /// ```text
    /// Operator types quantity: 0
    ///      │
    ///      ▼
    /// calculate() → validate_return_context()
    ///      │
    ///      ▼
    /// InvalidInput(MustBePositive { field: "quantity_returned" })
    ///      │
    ///      ▼
    /// UI shows: "quantity_returned must be positive"
    /// ```
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// A return line asks for more units than are still out on rental.
    #[error("Cannot return {requested} of {sku}: only {outstanding} outstanding")]
    QuantityExceedsOutstanding {
        sku: String,
        outstanding: i64,
        requested: i64,
    },

    /// An intermediate amount left the i64 cent range.
    #[error("Amount overflow while computing {field}")]
    AmountOverflow { field: String },

    /// The business rules themselves are unusable.
    #[error("Invalid return rules: {0}")]
    InvalidRules(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These map one-to-one onto form validation messages in the return wizard.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Amount must not be negative.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: i64 },

    /// End of a date range falls before its start.
    #[error("{end_field} must not be before {start_field}")]
    InvalidDateRange {
        start_field: String,
        end_field: String,
    },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
