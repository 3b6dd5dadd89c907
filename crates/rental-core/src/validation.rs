//! # Validation Module
//!
//! Precondition checks run before any settlement arithmetic.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                       │
//! │  ├── Malformed dates, unknown grades/severities                         │
//! │  └── Rejected before a value even exists                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Non-positive quantity                                              │
//! │  ├── Negative rates, deposits, repair costs, overrides                  │
//! │  └── Rental window ending before it starts                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend API                                                   │
//! │  └── Quantity vs. live stock, authorization                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{FeeOverrides, OutstandingRental, ReturnContext};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a non-empty identifier or label.
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the quantity being returned on a line.
///
/// ```rust
/// use rental_core::validation::validate_quantity_returned;
///
/// assert!(validate_quantity_returned(2).is_ok());
/// assert!(validate_quantity_returned(0).is_err());
/// assert!(validate_quantity_returned(-1).is_err());
/// ```
pub fn validate_quantity_returned(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity_returned".to_string(),
        });
    }
    Ok(())
}

/// Validates that an amount is zero or more.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: amount.cents(),
        });
    }
    Ok(())
}

/// Validates that a rental window does not end before it starts.
pub fn validate_rental_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ValidationResult<()> {
    if end < start {
        return Err(ValidationError::InvalidDateRange {
            start_field: "rental_start_date".to_string(),
            end_field: "rental_end_date".to_string(),
        });
    }
    Ok(())
}

/// Validates a quantity counter that may be zero.
pub fn validate_count(field: &str, count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

pub fn validate_outstanding_rental(rental: &OutstandingRental) -> ValidationResult<()> {
    validate_identifier("transaction_line_id", &rental.transaction_line_id)?;
    validate_identifier("sku_id", &rental.sku_id)?;
    validate_identifier("item_name", &rental.item_name)?;
    validate_count("quantity_rented", rental.quantity_rented)?;
    validate_count("quantity_returned", rental.quantity_returned)?;
    validate_count("quantity_outstanding", rental.quantity_outstanding)?;
    validate_amount("daily_rate", rental.daily_rate)?;
    validate_amount("deposit_per_unit", rental.deposit_per_unit)?;
    validate_rental_window(rental.rental_start_date, rental.rental_end_date)
}

pub fn validate_return_context(context: &ReturnContext) -> ValidationResult<()> {
    validate_quantity_returned(context.quantity_returned)?;
    for defect in &context.defects {
        validate_amount("repair_cost", defect.repair_cost)?;
    }
    Ok(())
}

pub fn validate_overrides(overrides: &FeeOverrides) -> ValidationResult<()> {
    if let Some(rate) = overrides.late_fee_rate {
        validate_amount("late_fee_rate", rate)?;
    }
    if let Some(cost) = overrides.cleaning_cost {
        validate_amount("cleaning_cost", cost)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("sku_id", "SKU-001").is_ok());
        assert!(validate_identifier("sku_id", "").is_err());
        assert!(validate_identifier("sku_id", "   ").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("daily_rate", Money::zero()).is_ok());
        assert!(validate_amount("daily_rate", Money::from_cents(50_000)).is_ok());
        let err = validate_amount("daily_rate", Money::from_cents(-1)).unwrap_err();
        assert!(matches!(err, ValidationError::Negative { ref field, value: -1 } if field == "daily_rate"));
    }

    #[test]
    fn test_validate_rental_window() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert!(validate_rental_window(start, end).is_ok());
        assert!(validate_rental_window(start, start).is_ok());
        assert!(validate_rental_window(end, start).is_err());
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count("quantity_outstanding", 0).is_ok());
        assert!(validate_count("quantity_outstanding", -2).is_err());
    }
}
