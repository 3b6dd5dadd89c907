//! # rental-core: Pure Return Settlement Logic
//!
//! Settles rental returns: late fees, cleaning and damage charges, deposit
//! refunds and the signed net amount between customer and business. Every
//! function here is pure, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Rental Returns Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                Return Wizard (browser) / rental-returns CLI     │    │
//! │  │   Select items ──► Inspect ──► Fees ──► Review ──► Confirm      │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ ReturnLineInput (JSON)                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ rental-core (THIS CRATE) ★                      │    │
//! │  │                                                                 │    │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────────┐           │    │
//! │  │   │  types  │  │  money  │  │  rules  │  │validation│           │    │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └──────────┘           │    │
//! │  │          ┌──────────────┐      ┌──────────────┐                 │    │
//! │  │          │     fees     │ ───► │   summary    │                 │    │
//! │  │          └──────────────┘      └──────────────┘                 │    │
//! │  │   NO I/O • NO GLOBAL RULES • PURE FUNCTIONS                     │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │                                │ ReturnCalculation / ReturnSummary      │
//! │                                ▼                                        │
//! │                  Backend "confirm return" API (persists)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (rentals, defects, grades, results)
//! - [`money`] - Integer-cent Money type
//! - [`rules`] - Business rules passed into every calculation
//! - [`validation`] - Input preconditions
//! - [`fees`] - Single-line fee calculator
//! - [`summary`] - Multi-line returns and review totals
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rental_core::{Money, RateMultiplier, ReturnRules};
//!
//! let rules = ReturnRules::default();
//! assert_eq!(rules.late_fee_multiplier, RateMultiplier::from_bps(15000));
//!
//! let daily_rate = Money::from_major_minor(500, 0);
//! let late_rate = daily_rate.apply_multiplier(rules.late_fee_multiplier);
//! assert_eq!(late_rate.cents(), 75_000);
//! ```

pub mod error;
pub mod fees;
pub mod money;
pub mod rules;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use fees::calculate;
pub use money::Money;
pub use rules::{CleaningFeeTable, DamageMultiplierTable, ReturnRules};
pub use summary::{
    calculate_batch, classify_return_type, settle_return, summarize, ReturnLineInput,
    ReturnSettlement, ReturnSummary,
};
pub use types::*;
