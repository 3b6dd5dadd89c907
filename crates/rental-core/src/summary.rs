//! # Return Summary
//!
//! Settles a multi-line return and rolls the lines up into the totals shown
//! on the wizard's review step.
//!
//! ```text
//! ReturnLineInput ─┐
//! ReturnLineInput ─┼─► calculate_batch() ──► [ReturnCalculation] ──► summarize()
//! ReturnLineInput ─┘         │                                           │
//!                            └─ qty ≤ outstanding per line               ▼
//!                                                                  ReturnSummary
//! ```
//!
//! Lines are independent of each other; batching only adds the
//! outstanding-quantity check the single-line calculator leaves to callers.

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::fees::{calculate, is_early_return};
use crate::money::Money;
use crate::rules::ReturnRules;
use crate::types::{FeeOverrides, OutstandingRental, ReturnCalculation, ReturnContext, ReturnType};

// =============================================================================
// Inputs
// =============================================================================

/// One line of a multi-line return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnLineInput {
    pub rental: OutstandingRental,
    pub context: ReturnContext,
    #[serde(default)]
    pub overrides: FeeOverrides,
}

// =============================================================================
// Outputs
// =============================================================================

/// Totals across every line of a return.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnSummary {
    pub total_items_returned: i64,
    /// Still out after this return.
    pub total_items_outstanding: i64,
    pub total_late_fees: Money,
    pub total_damage_costs: Money,
    pub total_cleaning_costs: Money,
    /// Deposit held against everything that was outstanding.
    pub total_deposit_held: Money,
    pub total_deposit_refund: Money,
    /// Positive: customer owes. Negative: refund due to the customer.
    pub net_amount_due: Money,
}

/// Everything the review step needs for one return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnSettlement {
    pub return_type: ReturnType,
    pub lines: Vec<ReturnCalculation>,
    pub summary: ReturnSummary,
}

// =============================================================================
// Operations
// =============================================================================

/// Settles every line, rejecting any line that returns more than is out.
///
/// The first failing line aborts the batch.
pub fn calculate_batch(
    lines: &[ReturnLineInput],
    rules: &ReturnRules,
) -> CoreResult<Vec<ReturnCalculation>> {
    lines
        .iter()
        .map(|line| {
            let requested = line.context.quantity_returned;
            let outstanding = line.rental.quantity_outstanding;
            if requested > outstanding {
                return Err(CoreError::QuantityExceedsOutstanding {
                    sku: line.rental.sku_code.clone(),
                    outstanding,
                    requested,
                });
            }
            calculate(&line.rental, &line.context, &line.overrides, rules)
        })
        .collect()
}

/// Rolls calculated lines up into review totals.
///
/// `outstanding` is every rental line still out before this return,
/// including lines the operator did not select.
///
/// ## Errors
/// [`CoreError::AmountOverflow`] if any total leaves the i64 cent range.
pub fn summarize(
    outstanding: &[OutstandingRental],
    calculations: &[ReturnCalculation],
) -> CoreResult<ReturnSummary> {
    let total_items_returned = checked_count(calculations.iter().map(|c| c.quantity_returned))
        .ok_or_else(|| overflow("total_items_returned"))?;
    let total_outstanding_before =
        checked_count(outstanding.iter().map(|r| r.quantity_outstanding))
            .ok_or_else(|| overflow("total_items_outstanding"))?;

    let total_late_fees = checked_total(calculations.iter().map(|c| c.late_fee_amount))
        .ok_or_else(|| overflow("total_late_fees"))?;
    let total_damage_costs = checked_total(calculations.iter().map(|c| c.damage_cost))
        .ok_or_else(|| overflow("total_damage_costs"))?;
    let total_cleaning_costs = checked_total(calculations.iter().map(|c| c.cleaning_cost))
        .ok_or_else(|| overflow("total_cleaning_costs"))?;
    let total_deposit_refund = checked_total(calculations.iter().map(|c| c.deposit_refund))
        .ok_or_else(|| overflow("total_deposit_refund"))?;

    let total_deposit_held = outstanding
        .iter()
        .try_fold(Money::zero(), |acc, r| {
            r.deposit_per_unit
                .checked_mul(r.quantity_outstanding)
                .and_then(|held| acc.checked_add(held))
        })
        .ok_or_else(|| overflow("total_deposit_held"))?;

    let net_amount_due = total_late_fees
        .checked_add(total_damage_costs)
        .and_then(|m| m.checked_add(total_cleaning_costs))
        .and_then(|m| m.checked_sub(total_deposit_refund))
        .ok_or_else(|| overflow("net_amount_due"))?;

    let total_items_outstanding = total_outstanding_before
        .checked_sub(total_items_returned)
        .ok_or_else(|| overflow("total_items_outstanding"))?;

    Ok(ReturnSummary {
        total_items_returned,
        total_items_outstanding,
        total_late_fees,
        total_damage_costs,
        total_cleaning_costs,
        total_deposit_held,
        total_deposit_refund,
        net_amount_due,
    })
}

fn checked_total(amounts: impl Iterator<Item = Money>) -> Option<Money> {
    amounts.fold(Some(Money::zero()), |acc, m| acc?.checked_add(m))
}

fn checked_count(counts: impl Iterator<Item = i64>) -> Option<i64> {
    counts.fold(Some(0i64), |acc, n| acc?.checked_add(n))
}

fn overflow(field: &str) -> CoreError {
    CoreError::AmountOverflow {
        field: field.to_string(),
    }
}

/// Infers the return type from what is being brought back.
///
/// ```text
/// every line fully returned? ── no ──► PARTIAL
///          │ yes
///          ▼
/// every line before its end date? ── no ──► FULL
///          │ yes
///          ▼
///        EARLY
/// ```
///
/// `DAMAGED` and `LOST` are never inferred.
pub fn classify_return_type(lines: &[ReturnLineInput]) -> ReturnType {
    if lines.is_empty() {
        return ReturnType::Partial;
    }

    let all_full = lines
        .iter()
        .all(|l| l.context.quantity_returned >= l.rental.quantity_outstanding);
    if !all_full {
        return ReturnType::Partial;
    }

    let all_early = lines
        .iter()
        .all(|l| is_early_return(&l.rental, l.context.return_date));
    if all_early {
        ReturnType::Early
    } else {
        ReturnType::Full
    }
}

/// Settles a whole return: per-line calculations, totals and return type.
///
/// `outstanding` lists every rental line still out on the transaction,
/// selected or not. When it is `None` only the selected lines' rentals
/// count toward the deposit held and the items left outstanding.
pub fn settle_return(
    lines: &[ReturnLineInput],
    outstanding: Option<&[OutstandingRental]>,
    rules: &ReturnRules,
) -> CoreResult<ReturnSettlement> {
    let calculations = calculate_batch(lines, rules)?;
    let summary = match outstanding {
        Some(all) => summarize(all, &calculations)?,
        None => {
            let selected: Vec<OutstandingRental> =
                lines.iter().map(|l| l.rental.clone()).collect();
            summarize(&selected, &calculations)?
        }
    };
    let return_type = classify_return_type(lines);

    info!(
        lines = calculations.len(),
        items = summary.total_items_returned,
        return_type = ?return_type,
        net_amount_due = %summary.net_amount_due,
        "Return settled"
    );

    Ok(ReturnSettlement {
        return_type,
        lines: calculations,
        summary,
    })
}
