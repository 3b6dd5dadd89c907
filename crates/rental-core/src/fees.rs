//! # Fee Calculator
//!
//! Turns a rental's terms, the actual return, the inspection result and any
//! manual overrides into a [`ReturnCalculation`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        calculate()                                      │
//! │                                                                         │
//! │  0. validate inputs ───────────────► InvalidInput? stop, nothing built  │
//! │                                                                         │
//! │  1. days_overdue   = ceil((return − (end + grace)) / 1 day), ≥ 0        │
//! │  2. late_fee_rate  = override ?? daily_rate × multiplier                │
//! │  3. late_fee       = waived ? 0 : days × rate × qty                     │
//! │  4. cleaning_cost  = override ?? cleaning_fees[grade]                   │
//! │  5. damage_cost    = Σ repair_cost where customer_fault                 │
//! │  6. deposit_refund = max(0, deposit × qty − charges)                    │
//! │  7. net_refund     = deposit_refund − charges                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step is a pure function of its inputs. The wizard calls
//! `calculate` again on every edit rather than patching a previous result.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::rules::ReturnRules;
use crate::types::{Defect, FeeOverrides, OutstandingRental, ReturnCalculation, ReturnContext};
use crate::validation::{validate_outstanding_rental, validate_overrides, validate_return_context};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

fn overflow(field: &str) -> CoreError {
    CoreError::AmountOverflow {
        field: field.to_string(),
    }
}

// =============================================================================
// Individual Steps
// =============================================================================

/// Whole days a return is late once the grace period has elapsed.
///
/// A return at exactly `rental_end + grace` is on time. Any part of a day
/// past that instant counts as a full day.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use rental_core::{fees::days_overdue, ReturnRules};
///
/// let end = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
/// let returned = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
/// assert_eq!(days_overdue(end, returned, &ReturnRules::default()), 3);
/// ```
pub fn days_overdue(
    rental_end: DateTime<Utc>,
    return_date: DateTime<Utc>,
    rules: &ReturnRules,
) -> i64 {
    let grace = Duration::hours(i64::from(rules.grace_period_hours));
    // Past the last representable instant: no return_date can be later.
    let Some(expected_return) = rental_end.checked_add_signed(grace) else {
        return 0;
    };

    if return_date <= expected_return {
        return 0;
    }

    let late_ms = (return_date - expected_return).num_milliseconds();
    // ceiling division; late_ms > 0 here
    let days = (late_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    days.max(0)
}

/// Effective late fee per unit per day.
pub fn late_fee_rate(
    daily_rate: Money,
    overrides: &FeeOverrides,
    rules: &ReturnRules,
) -> CoreResult<Money> {
    match overrides.late_fee_rate {
        Some(rate) => Ok(rate),
        None => daily_rate
            .checked_apply_multiplier(rules.late_fee_multiplier)
            .ok_or_else(|| overflow("late_fee_rate")),
    }
}

/// Sum of repair costs for customer-fault defects.
///
/// Normal wear (`customer_fault == false`) is never charged.
pub fn damage_cost(defects: &[Defect]) -> CoreResult<Money> {
    defects
        .iter()
        .filter(|d| d.customer_fault)
        .try_fold(Money::zero(), |acc, d| acc.checked_add(d.repair_cost))
        .ok_or_else(|| overflow("damage_cost"))
}

/// True when the item came back before the contracted end of the rental.
#[inline]
pub fn is_early_return(rental: &OutstandingRental, return_date: DateTime<Utc>) -> bool {
    return_date < rental.rental_end_date
}

// =============================================================================
// Full Calculation
// =============================================================================

/// Settles one return line.
///
/// ## Errors
/// - [`CoreError::InvalidInput`] for non-positive quantity, negative amounts,
///   empty identifiers or a rental window that ends before it starts.
/// - [`CoreError::AmountOverflow`] if an amount leaves the i64 cent range.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use rental_core::{
///     calculate, ConditionGrade, FeeOverrides, Money, OutstandingRental, ReturnContext,
///     ReturnRules,
/// };
///
/// let rental = OutstandingRental {
///     transaction_id: "txn-1".into(),
///     transaction_line_id: "line-1".into(),
///     sku_id: "sku-1".into(),
///     sku_code: "TENT-4P".into(),
///     item_name: "Four-person tent".into(),
///     quantity_rented: 2,
///     quantity_returned: 0,
///     quantity_outstanding: 2,
///     rental_start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
///     rental_end_date: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
///     daily_rate: Money::from_major_minor(500, 0),
///     deposit_per_unit: Money::from_major_minor(2000, 0),
/// };
/// let context = ReturnContext {
///     quantity_returned: 2,
///     return_date: Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
///     condition_after: ConditionGrade::A,
///     defects: vec![],
/// };
///
/// let calc = calculate(&rental, &context, &FeeOverrides::default(), &ReturnRules::default())
///     .unwrap();
/// assert_eq!(calc.days_overdue, 3);
/// assert_eq!(calc.net_refund, Money::from_major_minor(-4500, 0));
/// ```
pub fn calculate(
    rental: &OutstandingRental,
    context: &ReturnContext,
    overrides: &FeeOverrides,
    rules: &ReturnRules,
) -> CoreResult<ReturnCalculation> {
    validate_outstanding_rental(rental)?;
    validate_return_context(context)?;
    validate_overrides(overrides)?;

    let qty = context.quantity_returned;

    let days = days_overdue(rental.rental_end_date, context.return_date, rules);
    let rate = late_fee_rate(rental.daily_rate, overrides, rules)?;

    let late_fee_amount = if overrides.waive_late_fees || days == 0 {
        Money::zero()
    } else {
        rate.checked_mul(days)
            .and_then(|m| m.checked_mul(qty))
            .ok_or_else(|| overflow("late_fee_amount"))?
    };

    let cleaning_cost = overrides
        .cleaning_cost
        .unwrap_or_else(|| rules.cleaning_fee(context.condition_after));

    let damage_cost = damage_cost(&context.defects)?;

    let total_deposit = rental
        .deposit_per_unit
        .checked_mul(qty)
        .ok_or_else(|| overflow("total_deposit"))?;

    let total_charges = late_fee_amount
        .checked_add(damage_cost)
        .and_then(|m| m.checked_add(cleaning_cost))
        .ok_or_else(|| overflow("total_charges"))?;

    let deposit_refund = total_deposit
        .checked_sub(total_charges)
        .ok_or_else(|| overflow("deposit_refund"))?
        .floor_zero();

    let net_refund = deposit_refund
        .checked_sub(total_charges)
        .ok_or_else(|| overflow("net_refund"))?;

    debug!(
        line = %rental.transaction_line_id,
        sku = %rental.sku_id,
        qty,
        days_overdue = days,
        late_fee = %late_fee_amount,
        damage = %damage_cost,
        cleaning = %cleaning_cost,
        deposit_refund = %deposit_refund,
        net_refund = %net_refund,
        "Return line settled"
    );

    Ok(ReturnCalculation {
        transaction_line_id: rental.transaction_line_id.clone(),
        sku_id: rental.sku_id.clone(),
        quantity_returned: qty,
        daily_rate: rental.daily_rate,
        deposit_per_unit: rental.deposit_per_unit,
        days_overdue: days,
        late_fee_rate: rate,
        late_fee_amount,
        damage_cost,
        cleaning_cost,
        total_deposit,
        total_charges,
        deposit_refund,
        net_refund,
        early_return: is_early_return(rental, context.return_date),
        late_fees_waived: overrides.waive_late_fees && days > 0,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::{ConditionGrade, DefectSeverity, DefectType, Settlement};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn units(major: i64) -> Money {
        Money::from_major_minor(major, 0)
    }

    fn rental() -> OutstandingRental {
        OutstandingRental {
            transaction_id: "txn-100".to_string(),
            transaction_line_id: "line-1".to_string(),
            sku_id: "sku-tent".to_string(),
            sku_code: "TENT-4P".to_string(),
            item_name: "Four-person tent".to_string(),
            quantity_rented: 2,
            quantity_returned: 0,
            quantity_outstanding: 2,
            rental_start_date: at(2024, 1, 1, 0),
            rental_end_date: at(2024, 1, 5, 0),
            daily_rate: units(500),
            deposit_per_unit: units(2000),
        }
    }

    fn context(return_date: DateTime<Utc>, grade: ConditionGrade) -> ReturnContext {
        ReturnContext {
            quantity_returned: 2,
            return_date,
            condition_after: grade,
            defects: vec![],
        }
    }

    fn defect(repair: i64, customer_fault: bool) -> Defect {
        Defect {
            defect_type: DefectType::PhysicalDamage,
            severity: DefectSeverity::Moderate,
            description: String::new(),
            customer_fault,
            repair_cost: units(repair),
        }
    }

    fn run(ctx: &ReturnContext, overrides: &FeeOverrides) -> ReturnCalculation {
        calculate(&rental(), ctx, overrides, &ReturnRules::default()).unwrap()
    }

    // -------------------------------------------------------------------------
    // Concrete scenarios
    // -------------------------------------------------------------------------

    #[test]
    fn test_on_time_return_no_defects() {
        let calc = run(&context(at(2024, 1, 5, 0), ConditionGrade::A), &FeeOverrides::default());

        assert_eq!(calc.days_overdue, 0);
        assert_eq!(calc.late_fee_amount, Money::zero());
        assert_eq!(calc.damage_cost, Money::zero());
        assert_eq!(calc.cleaning_cost, Money::zero());
        assert_eq!(calc.deposit_refund, units(4000));
        assert_eq!(calc.net_refund, units(4000));
        assert_eq!(calc.settlement(), Settlement::Refund { amount: units(4000) });
        assert!(!calc.early_return);
    }

    #[test]
    fn test_overdue_return() {
        let calc = run(&context(at(2024, 1, 8, 0), ConditionGrade::A), &FeeOverrides::default());

        assert_eq!(calc.days_overdue, 3);
        assert_eq!(calc.late_fee_rate, units(750));
        assert_eq!(calc.late_fee_amount, units(4500));
        assert_eq!(calc.deposit_refund, Money::zero());
        assert_eq!(calc.net_refund, units(-4500));
        assert_eq!(calc.settlement(), Settlement::Due { amount: units(4500) });
    }

    #[test]
    fn test_overdue_with_cleaning_and_damage() {
        let mut ctx = context(at(2024, 1, 8, 0), ConditionGrade::B);
        ctx.defects.push(defect(300, true));
        let calc = run(&ctx, &FeeOverrides::default());

        assert_eq!(calc.cleaning_cost, units(200));
        assert_eq!(calc.damage_cost, units(300));
        assert_eq!(calc.total_charges, units(5000));
        assert_eq!(calc.deposit_refund, Money::zero());
        assert_eq!(calc.net_refund, units(-5000));
    }

    #[test]
    fn test_waived_late_fees() {
        let overrides = FeeOverrides {
            waive_late_fees: true,
            ..Default::default()
        };
        let calc = run(&context(at(2024, 1, 8, 0), ConditionGrade::A), &overrides);

        assert_eq!(calc.days_overdue, 3);
        assert_eq!(calc.late_fee_amount, Money::zero());
        assert_eq!(calc.deposit_refund, units(4000));
        assert_eq!(calc.net_refund, units(4000));
        assert!(calc.late_fees_waived);
    }

    #[test]
    fn test_waiver_on_time_is_not_reported_as_waived() {
        let overrides = FeeOverrides {
            waive_late_fees: true,
            ..Default::default()
        };
        let calc = run(&context(at(2024, 1, 5, 0), ConditionGrade::A), &overrides);
        assert!(!calc.late_fees_waived);
    }

    #[test]
    fn test_only_customer_fault_defects_are_charged() {
        let mut ctx = context(at(2024, 1, 5, 0), ConditionGrade::A);
        ctx.defects = vec![defect(100, true), defect(500, false)];
        let calc = run(&ctx, &FeeOverrides::default());
        assert_eq!(calc.damage_cost, units(100));
    }

    #[test]
    fn test_late_fee_rate_override_replaces_computed_rate() {
        let overrides = FeeOverrides {
            late_fee_rate: Some(units(100)),
            ..Default::default()
        };
        let calc = run(&context(at(2024, 1, 8, 0), ConditionGrade::A), &overrides);

        assert_eq!(calc.late_fee_rate, units(100));
        assert_eq!(calc.late_fee_amount, units(600));
    }

    #[test]
    fn test_cleaning_override_replaces_table_value() {
        let overrides = FeeOverrides {
            cleaning_cost: Some(units(50)),
            ..Default::default()
        };
        let calc = run(&context(at(2024, 1, 5, 0), ConditionGrade::D), &overrides);
        assert_eq!(calc.cleaning_cost, units(50));
        assert_eq!(calc.deposit_refund, units(3950));
    }

    // -------------------------------------------------------------------------
    // Invariants
    // -------------------------------------------------------------------------

    #[test]
    fn test_net_refund_reconciles_exactly() {
        let grades = ConditionGrade::ALL;
        let returns = [at(2024, 1, 3, 0), at(2024, 1, 5, 4), at(2024, 1, 6, 0), at(2024, 2, 1, 0)];

        for grade in grades {
            for return_date in returns {
                let mut ctx = context(return_date, grade);
                ctx.defects = vec![defect(123, true), defect(77, false)];
                let calc = run(&ctx, &FeeOverrides::default());

                assert!(calc.deposit_refund >= Money::zero());
                assert!(calc.late_fee_amount >= Money::zero());
                assert_eq!(
                    calc.net_refund,
                    calc.deposit_refund - (calc.late_fee_amount + calc.damage_cost + calc.cleaning_cost)
                );
            }
        }
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let mut ctx = context(at(2024, 1, 9, 13), ConditionGrade::C);
        ctx.defects.push(defect(250, true));
        let first = run(&ctx, &FeeOverrides::default());
        let second = run(&ctx, &FeeOverrides::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_quantity_scales_late_fee_and_deposit() {
        let mut ctx = context(at(2024, 1, 8, 0), ConditionGrade::A);
        ctx.quantity_returned = 1;
        let one = run(&ctx, &FeeOverrides::default());
        ctx.quantity_returned = 2;
        let two = run(&ctx, &FeeOverrides::default());

        assert_eq!(two.late_fee_amount, one.late_fee_amount.checked_mul(2).unwrap());
        assert_eq!(two.total_deposit, one.total_deposit.checked_mul(2).unwrap());
    }

    #[test]
    fn test_early_return_flag() {
        let calc = run(&context(at(2024, 1, 3, 0), ConditionGrade::A), &FeeOverrides::default());
        assert!(calc.early_return);
        assert_eq!(calc.days_overdue, 0);
    }

    // -------------------------------------------------------------------------
    // Days-overdue boundaries
    // -------------------------------------------------------------------------

    #[test]
    fn test_return_at_grace_boundary_is_on_time() {
        let rules = ReturnRules::default();
        let end = at(2024, 1, 5, 0);
        assert_eq!(days_overdue(end, at(2024, 1, 5, 4), &rules), 0);
    }

    #[test]
    fn test_partial_days_round_up() {
        let rules = ReturnRules::default();
        let end = at(2024, 1, 5, 0);
        let boundary = at(2024, 1, 5, 4);

        assert_eq!(days_overdue(end, boundary + Duration::milliseconds(1), &rules), 1);
        // 23.9 hours late
        assert_eq!(days_overdue(end, boundary + Duration::minutes(23 * 60 + 54), &rules), 1);
        assert_eq!(days_overdue(end, boundary + Duration::hours(24), &rules), 1);
        assert_eq!(
            days_overdue(end, boundary + Duration::hours(24) + Duration::milliseconds(1), &rules),
            2
        );
    }

    #[test]
    fn test_grace_past_calendar_end_is_never_late() {
        let rules = ReturnRules::default();
        let end = DateTime::<Utc>::MAX_UTC - Duration::hours(1);
        assert_eq!(days_overdue(end, DateTime::<Utc>::MAX_UTC, &rules), 0);
    }

    #[test]
    fn test_zero_grace_period() {
        let rules = ReturnRules {
            grace_period_hours: 0,
            ..Default::default()
        };
        let end = at(2024, 1, 5, 0);
        assert_eq!(days_overdue(end, end, &rules), 0);
        assert_eq!(days_overdue(end, at(2024, 1, 5, 1), &rules), 1);
    }

    #[test]
    fn test_custom_multiplier_from_rules() {
        let rules = ReturnRules {
            late_fee_multiplier: crate::types::RateMultiplier::from_bps(20000),
            ..Default::default()
        };
        let calc = calculate(
            &rental(),
            &context(at(2024, 1, 8, 0), ConditionGrade::A),
            &FeeOverrides::default(),
            &rules,
        )
        .unwrap();
        assert_eq!(calc.late_fee_rate, units(1000));
        assert_eq!(calc.late_fee_amount, units(6000));
    }

    // -------------------------------------------------------------------------
    // Rejected inputs
    // -------------------------------------------------------------------------

    fn expect_invalid(result: CoreResult<ReturnCalculation>) -> ValidationError {
        match result {
            Err(CoreError::InvalidInput(e)) => e,
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let rules = ReturnRules::default();
        let overrides = FeeOverrides::default();
        for qty in [0, -1] {
            let mut ctx = context(at(2024, 1, 5, 0), ConditionGrade::A);
            ctx.quantity_returned = qty;
            let err = expect_invalid(calculate(&rental(), &ctx, &overrides, &rules));
            assert!(matches!(err, ValidationError::MustBePositive { .. }));
        }
    }

    #[test]
    fn test_rejects_negative_amounts() {
        let rules = ReturnRules::default();
        let ctx = context(at(2024, 1, 5, 0), ConditionGrade::A);

        let mut r = rental();
        r.daily_rate = Money::from_cents(-1);
        expect_invalid(calculate(&r, &ctx, &FeeOverrides::default(), &rules));

        let mut r = rental();
        r.deposit_per_unit = Money::from_cents(-1);
        expect_invalid(calculate(&r, &ctx, &FeeOverrides::default(), &rules));

        let mut bad_ctx = ctx.clone();
        bad_ctx.defects.push(defect(-5, true));
        expect_invalid(calculate(&rental(), &bad_ctx, &FeeOverrides::default(), &rules));

        let overrides = FeeOverrides {
            cleaning_cost: Some(Money::from_cents(-100)),
            ..Default::default()
        };
        expect_invalid(calculate(&rental(), &ctx, &overrides, &rules));
    }

    #[test]
    fn test_rejects_inverted_rental_window() {
        let mut r = rental();
        r.rental_end_date = at(2023, 12, 31, 0);
        let err = expect_invalid(calculate(
            &r,
            &context(at(2024, 1, 5, 0), ConditionGrade::A),
            &FeeOverrides::default(),
            &ReturnRules::default(),
        ));
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut r = rental();
        r.deposit_per_unit = Money::from_cents(i64::MAX);
        let result = calculate(
            &r,
            &context(at(2024, 1, 5, 0), ConditionGrade::A),
            &FeeOverrides::default(),
            &ReturnRules::default(),
        );
        assert!(matches!(result, Err(CoreError::AmountOverflow { .. })));
    }

    #[test]
    fn test_late_fee_rate_overflow_is_reported() {
        let mut r = rental();
        r.daily_rate = Money::from_cents(i64::MAX);
        let result = calculate(
            &r,
            &context(at(2024, 1, 8, 0), ConditionGrade::A),
            &FeeOverrides::default(),
            &ReturnRules::default(),
        );
        assert!(matches!(
            result,
            Err(CoreError::AmountOverflow { ref field }) if field == "late_fee_rate"
        ));
    }
}
