//! # Return Business Rules
//!
//! The configurable constants consumed by the fee calculator.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ReturnRules (injected)                              │
//! │                                                                         │
//! │  grace_period_hours ────────► days overdue                              │
//! │  late_fee_multiplier ───────► late fee rate = daily rate × multiplier   │
//! │  cleaning_fees[grade] ──────► cleaning cost                             │
//! │  damage_multipliers[sev] ───► suggested repair cost (inspection aid)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules are plain data passed into every calculation, so the same inputs can
//! be settled under different business configurations side by side. Loading
//! them from disk or the environment is the caller's job.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ConditionGrade, DefectSeverity, RateMultiplier};

/// Upper bound for the late-fee multiplier (10×).
pub const MAX_LATE_FEE_MULTIPLIER_BPS: u32 = 100_000;

/// Upper bound for a damage multiplier (100% of item value).
pub const MAX_DAMAGE_MULTIPLIER_BPS: u32 = 10_000;

// =============================================================================
// Cleaning Fee Table
// =============================================================================

/// Cleaning fee per condition grade.
///
/// Cost is expected to rise as the grade worsens; this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CleaningFeeTable {
    pub a: Money,
    pub b: Money,
    pub c: Money,
    pub d: Money,
}

impl CleaningFeeTable {
    pub fn fee(&self, grade: ConditionGrade) -> Money {
        match grade {
            ConditionGrade::A => self.a,
            ConditionGrade::B => self.b,
            ConditionGrade::C => self.c,
            ConditionGrade::D => self.d,
        }
    }
}

impl Default for CleaningFeeTable {
    fn default() -> Self {
        CleaningFeeTable {
            a: Money::zero(),
            b: Money::from_major_minor(200, 0),
            c: Money::from_major_minor(500, 0),
            d: Money::from_major_minor(1000, 0),
        }
    }
}

// =============================================================================
// Damage Multiplier Table
// =============================================================================

/// Share of item value suggested as repair cost, per defect severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct DamageMultiplierTable {
    pub minor: RateMultiplier,
    pub moderate: RateMultiplier,
    pub major: RateMultiplier,
    pub critical: RateMultiplier,
}

impl DamageMultiplierTable {
    pub fn multiplier(&self, severity: DefectSeverity) -> RateMultiplier {
        match severity {
            DefectSeverity::Minor => self.minor,
            DefectSeverity::Moderate => self.moderate,
            DefectSeverity::Major => self.major,
            DefectSeverity::Critical => self.critical,
        }
    }
}

impl Default for DamageMultiplierTable {
    fn default() -> Self {
        DamageMultiplierTable {
            minor: RateMultiplier::from_bps(1000),
            moderate: RateMultiplier::from_bps(2500),
            major: RateMultiplier::from_bps(5000),
            critical: RateMultiplier::from_bps(10000),
        }
    }
}

// =============================================================================
// Return Rules
// =============================================================================

/// Business rules for settling rental returns.
///
/// ## Defaults
/// | Rule                | Value                          |
/// |---------------------|--------------------------------|
/// | grace period        | 4 hours                        |
/// | late fee multiplier | 150% of daily rate             |
/// | cleaning fees       | A 0, B 200, C 500, D 1000      |
/// | damage multipliers  | 10% / 25% / 50% / 100%         |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnRules {
    #[serde(default = "default_grace_period_hours")]
    pub grace_period_hours: u32,

    #[serde(default = "default_late_fee_multiplier")]
    pub late_fee_multiplier: RateMultiplier,

    #[serde(default)]
    pub cleaning_fees: CleaningFeeTable,

    #[serde(default)]
    pub damage_multipliers: DamageMultiplierTable,
}

fn default_grace_period_hours() -> u32 {
    4
}

fn default_late_fee_multiplier() -> RateMultiplier {
    RateMultiplier::from_bps(15000)
}

impl Default for ReturnRules {
    fn default() -> Self {
        ReturnRules {
            grace_period_hours: default_grace_period_hours(),
            late_fee_multiplier: default_late_fee_multiplier(),
            cleaning_fees: CleaningFeeTable::default(),
            damage_multipliers: DamageMultiplierTable::default(),
        }
    }
}

impl ReturnRules {
    /// Checks that the rules can produce sane settlements.
    pub fn validate(&self) -> CoreResult<()> {
        for grade in ConditionGrade::ALL {
            let fee = self.cleaning_fees.fee(grade);
            if fee.is_negative() {
                return Err(CoreError::InvalidRules(format!(
                    "cleaning fee for grade {} must not be negative (got {})",
                    grade,
                    fee.cents()
                )));
            }
        }

        if self.late_fee_multiplier.bps() > MAX_LATE_FEE_MULTIPLIER_BPS {
            return Err(CoreError::InvalidRules(format!(
                "late_fee_multiplier must be at most {} bps (got {})",
                MAX_LATE_FEE_MULTIPLIER_BPS,
                self.late_fee_multiplier.bps()
            )));
        }

        let damage = &self.damage_multipliers;
        for (name, m) in [
            ("minor", damage.minor),
            ("moderate", damage.moderate),
            ("major", damage.major),
            ("critical", damage.critical),
        ] {
            if m.bps() > MAX_DAMAGE_MULTIPLIER_BPS {
                return Err(CoreError::InvalidRules(format!(
                    "damage multiplier for {} must be at most {} bps (got {})",
                    name,
                    MAX_DAMAGE_MULTIPLIER_BPS,
                    m.bps()
                )));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn cleaning_fee(&self, grade: ConditionGrade) -> Money {
        self.cleaning_fees.fee(grade)
    }

    /// Suggested repair cost for a defect on an item of the given value.
    ///
    /// Used to pre-fill `repair_cost` on the inspection form; the operator
    /// may change it before calculating.
    ///
    /// ```rust
    /// use rental_core::{DefectSeverity, Money, ReturnRules};
    ///
    /// let rules = ReturnRules::default();
    /// let value = Money::from_major_minor(1200, 0);
    /// assert_eq!(
    ///     rules.suggested_repair_cost(value, DefectSeverity::Moderate),
    ///     Money::from_major_minor(300, 0)
    /// );
    /// ```
    pub fn suggested_repair_cost(&self, item_value: Money, severity: DefectSeverity) -> Money {
        item_value.apply_multiplier(self.damage_multipliers.multiplier(severity))
    }
}
