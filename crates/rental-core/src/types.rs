//! # Domain Types
//!
//! Core domain types for rental returns.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUTS                                                                 │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │ OutstandingRental│   │  ReturnContext   │   │  FeeOverrides   │      │
//! │  │  daily_rate      │   │  quantity        │   │  late_fee_rate? │      │
//! │  │  deposit_per_unit│   │  return_date     │   │  cleaning_cost? │      │
//! │  │  rental window   │   │  condition_after │   │  waive_late_fees│      │
//! │  └──────────────────┘   │  defects ──► Defect  └─────────────────┘      │
//! │                         └──────────────────┘                            │
//! │                                                                         │
//! │  OUTPUT                                                                 │
//! │  ┌──────────────────────────────────────────┐   ┌─────────────────┐     │
//! │  │ ReturnCalculation                        │──►│   Settlement    │     │
//! │  │  days_overdue, late fee, damage, cleaning│   │ Refund/Due/Even │     │
//! │  │  deposit_refund (≥ 0), net_refund (±)    │   └─────────────────┘     │
//! │  └──────────────────────────────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Enumerations are closed: an unknown grade or severity fails at
//! deserialization instead of falling through to a default fee.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate Multiplier
// =============================================================================

/// A fractional multiplier in basis points (10000 bps = 1.0×).
///
/// ## Why Basis Points?
/// The late-fee rule is "150% of the daily rate" and damage suggestions are
/// "10% of item value". Basis points keep both in integer arithmetic:
/// 15000 bps = 1.5×, 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateMultiplier(u32);

impl RateMultiplier {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        RateMultiplier(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Condition Grade
// =============================================================================

/// Post-rental condition grade assigned during inspection.
///
/// A is best, D is worst. Drives the cleaning-fee lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ConditionGrade {
    A,
    B,
    C,
    D,
}

impl ConditionGrade {
    pub const ALL: [ConditionGrade; 4] = [
        ConditionGrade::A,
        ConditionGrade::B,
        ConditionGrade::C,
        ConditionGrade::D,
    ];
}

impl fmt::Display for ConditionGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionGrade::A => "A",
            ConditionGrade::B => "B",
            ConditionGrade::C => "C",
            ConditionGrade::D => "D",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Defects
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefectSeverity {
    Minor,
    Moderate,
    Major,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefectType {
    CosmeticDamage,
    FunctionalDamage,
    MissingParts,
    MissingAccessories,
    ExcessiveWear,
    TotalFailure,
    WaterDamage,
    PhysicalDamage,
}

/// A defect found during the post-rental inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Defect {
    pub defect_type: DefectType,
    pub severity: DefectSeverity,
    #[serde(default)]
    pub description: String,
    /// Renter misuse, as opposed to normal wear. Only these are charged.
    pub customer_fault: bool,
    pub repair_cost: Money,
}

/// Follow-up suggested by the inspection for a returned item.
///
/// ```text
/// any CRITICAL defect ─────────► QUARANTINE
/// grade D ─────────────────────► MAJOR_REPAIR
/// grade C with defects ────────► MINOR_REPAIR
/// grade C, no defects ─────────► DEEP_CLEANING
/// grade B ─────────────────────► MINOR_CLEANING
/// grade A ─────────────────────► RETURN_TO_INVENTORY
/// ```
///
/// `WRITE_OFF` is only ever chosen by the operator.
pub fn recommended_action(grade: ConditionGrade, defects: &[Defect]) -> RecommendedAction {
    if defects
        .iter()
        .any(|d| d.severity == DefectSeverity::Critical)
    {
        return RecommendedAction::Quarantine;
    }

    match grade {
        ConditionGrade::D => RecommendedAction::MajorRepair,
        ConditionGrade::C if !defects.is_empty() => RecommendedAction::MinorRepair,
        ConditionGrade::C => RecommendedAction::DeepCleaning,
        ConditionGrade::B => RecommendedAction::MinorCleaning,
        ConditionGrade::A => RecommendedAction::ReturnToInventory,
    }
}

// =============================================================================
// Inspection Follow-up
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    ReturnToInventory,
    MinorCleaning,
    DeepCleaning,
    MinorRepair,
    MajorRepair,
    Quarantine,
    WriteOff,
}

/// Kind of return shown on the wizard header.
///
/// `Damaged` and `Lost` are chosen by the operator; the others can be
/// inferred with [`crate::summary::classify_return_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnType {
    #[default]
    Partial,
    Full,
    Early,
    Damaged,
    Lost,
}

// =============================================================================
// Outstanding Rental
// =============================================================================

/// One rental line still owed back by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OutstandingRental {
    pub transaction_id: String,
    pub transaction_line_id: String,
    pub sku_id: String,
    pub sku_code: String,
    pub item_name: String,
    pub quantity_rented: i64,
    /// Units already brought back on earlier returns.
    pub quantity_returned: i64,
    pub quantity_outstanding: i64,
    #[ts(as = "String")]
    pub rental_start_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub rental_end_date: DateTime<Utc>,
    /// Price per unit per day.
    pub daily_rate: Money,
    /// Refundable deposit held per unit.
    pub deposit_per_unit: Money,
}

// =============================================================================
// Return Context & Overrides
// =============================================================================

/// What the operator recorded for this return line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnContext {
    pub quantity_returned: i64,
    /// Actual physical return instant.
    #[ts(as = "String")]
    pub return_date: DateTime<Utc>,
    pub condition_after: ConditionGrade,
    #[serde(default)]
    pub defects: Vec<Defect>,
}

impl ReturnContext {
    /// Follow-up for this line given its grade and recorded defects.
    pub fn recommended_action(&self) -> RecommendedAction {
        recommended_action(self.condition_after, &self.defects)
    }
}

/// Manual adjustments made on the fee step of the wizard.
///
/// Overrides replace the computed value; they are never added to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct FeeOverrides {
    pub late_fee_rate: Option<Money>,
    pub cleaning_cost: Option<Money>,
    /// Management approval to drop late fees entirely.
    pub waive_late_fees: bool,
}

// =============================================================================
// Return Calculation
// =============================================================================

/// Settlement for a single return line.
///
/// Produced fresh on every recalculation; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnCalculation {
    pub transaction_line_id: String,
    pub sku_id: String,
    pub quantity_returned: i64,
    pub daily_rate: Money,
    pub deposit_per_unit: Money,
    pub days_overdue: i64,
    /// Effective per-day, per-unit rate (computed or overridden).
    pub late_fee_rate: Money,
    pub late_fee_amount: Money,
    pub damage_cost: Money,
    pub cleaning_cost: Money,
    pub total_deposit: Money,
    pub total_charges: Money,
    /// Never negative.
    pub deposit_refund: Money,
    /// Positive: owed to the customer. Negative: owed by the customer.
    pub net_refund: Money,
    pub early_return: bool,
    /// Waiver applied to a return that was actually overdue.
    pub late_fees_waived: bool,
}

impl ReturnCalculation {
    /// Classifies the net refund for display.
    ///
    /// ```rust
    /// # use rental_core::{Money, Settlement};
    /// assert_eq!(
    ///     Settlement::from_net(Money::from_cents(-450_000)),
    ///     Settlement::Due { amount: Money::from_cents(450_000) }
    /// );
    /// ```
    pub fn settlement(&self) -> Settlement {
        Settlement::from_net(self.net_refund)
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// Who pays whom once a return is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Settlement {
    /// Business owes the customer.
    Refund { amount: Money },
    /// Customer owes the business (amount is positive).
    Due { amount: Money },
    BreakEven,
}

impl Settlement {
    pub fn from_net(net: Money) -> Self {
        if net.is_positive() {
            Settlement::Refund { amount: net }
        } else if net.is_negative() {
            Settlement::Due { amount: net.abs() }
        } else {
            Settlement::BreakEven
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn defect(severity: DefectSeverity) -> Defect {
        Defect {
            defect_type: DefectType::CosmeticDamage,
            severity,
            description: String::new(),
            customer_fault: false,
            repair_cost: Money::zero(),
        }
    }

    #[test]
    fn test_recommended_action_without_defects() {
        use RecommendedAction::*;
        assert_eq!(recommended_action(ConditionGrade::A, &[]), ReturnToInventory);
        assert_eq!(recommended_action(ConditionGrade::B, &[]), MinorCleaning);
        assert_eq!(recommended_action(ConditionGrade::C, &[]), DeepCleaning);
        assert_eq!(recommended_action(ConditionGrade::D, &[]), MajorRepair);
    }

    #[test]
    fn test_recommended_action_with_defects() {
        use RecommendedAction::*;
        let minor = [defect(DefectSeverity::Minor)];
        assert_eq!(recommended_action(ConditionGrade::C, &minor), MinorRepair);
        assert_eq!(recommended_action(ConditionGrade::B, &minor), MinorCleaning);
        assert_eq!(recommended_action(ConditionGrade::A, &minor), ReturnToInventory);
        assert_eq!(recommended_action(ConditionGrade::D, &minor), MajorRepair);
    }

    #[test]
    fn test_critical_defect_quarantines_any_grade() {
        let defects = [defect(DefectSeverity::Minor), defect(DefectSeverity::Critical)];
        for grade in ConditionGrade::ALL {
            assert_eq!(
                recommended_action(grade, &defects),
                RecommendedAction::Quarantine
            );
        }
    }

    #[test]
    fn test_settlement_from_net() {
        assert_eq!(
            Settlement::from_net(Money::from_cents(400_000)),
            Settlement::Refund {
                amount: Money::from_cents(400_000)
            }
        );
        assert_eq!(
            Settlement::from_net(Money::from_cents(-500_000)),
            Settlement::Due {
                amount: Money::from_cents(500_000)
            }
        );
        assert_eq!(Settlement::from_net(Money::zero()), Settlement::BreakEven);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&DefectSeverity::Critical).unwrap(),
            "\"CRITICAL\""
        );
        assert_eq!(
            serde_json::to_string(&DefectType::MissingAccessories).unwrap(),
            "\"MISSING_ACCESSORIES\""
        );
        assert_eq!(serde_json::to_string(&ConditionGrade::B).unwrap(), "\"B\"");
        assert!(serde_json::from_str::<ConditionGrade>("\"E\"").is_err());
    }

    #[test]
    fn test_overrides_default_when_fields_missing() {
        let overrides: FeeOverrides = serde_json::from_str("{}").unwrap();
        assert_eq!(overrides, FeeOverrides::default());

        let overrides: FeeOverrides =
            serde_json::from_str(r#"{"late_fee_rate": 10000}"#).unwrap();
        assert_eq!(overrides.late_fee_rate, Some(Money::from_cents(10_000)));
        assert!(!overrides.waive_late_fees);
    }

    #[test]
    fn test_settlement_json_shape() {
        let json = serde_json::to_value(Settlement::Due {
            amount: Money::from_cents(450_000),
        })
        .unwrap();
        assert_eq!(json["type"], "due");
        assert_eq!(json["amount"], 450_000);
    }
}
