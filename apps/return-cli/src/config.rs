//! # Rules Configuration
//!
//! Loads the [`ReturnRules`] used for every settlement.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     RENTAL_GRACE_PERIOD_HOURS=2                                         │
//! │     RENTAL_LATE_FEE_MULTIPLIER_BPS=20000                                │
//! │     RENTAL_CLEANING_FEE_A .. RENTAL_CLEANING_FEE_D (cents)              │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     --config <path>, or                                                 │
//! │     ~/.config/returns/returns.toml (Linux)                              │
//! │     ~/Library/Application Support/com.rental.returns/returns.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     ReturnRules::default()                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! grace_period_hours = 4
//! late_fee_multiplier = 15000   # bps, 150% of the daily rate
//!
//! [cleaning_fees]               # cents per condition grade
//! a = 0
//! b = 20000
//! c = 50000
//! d = 100000
//!
//! [damage_multipliers]          # bps of item value per severity
//! minor = 1000
//! moderate = 2500
//! major = 5000
//! critical = 10000
//! ```

use std::path::{Path, PathBuf};

use rental_core::{Money, RateMultiplier, ReturnRules};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

pub const ENV_GRACE_PERIOD_HOURS: &str = "RENTAL_GRACE_PERIOD_HOURS";
pub const ENV_LATE_FEE_MULTIPLIER_BPS: &str = "RENTAL_LATE_FEE_MULTIPLIER_BPS";
pub const ENV_CLEANING_FEE_A: &str = "RENTAL_CLEANING_FEE_A";
pub const ENV_CLEANING_FEE_B: &str = "RENTAL_CLEANING_FEE_B";
pub const ENV_CLEANING_FEE_C: &str = "RENTAL_CLEANING_FEE_C";
pub const ENV_CLEANING_FEE_D: &str = "RENTAL_CLEANING_FEE_D";

const CONFIG_FILE_NAME: &str = "returns.toml";

/// Loads rules from file, environment, and defaults.
///
/// ## Load Order (later overrides earlier)
/// 1. Default values
/// 2. Config file (returns.toml); a missing file is not an error
/// 3. Environment variables
///
/// The result is validated; unusable rules are a hard error.
pub fn load_rules(config_path: Option<PathBuf>) -> CliResult<ReturnRules> {
    let mut rules = ReturnRules::default();

    if let Some(path) = config_path.or_else(default_config_path) {
        if path.exists() {
            info!(?path, "Loading return rules from file");
            let contents = std::fs::read_to_string(&path)?;
            rules = parse_rules(&contents)?;
        } else {
            debug!(?path, "Rules file not found, using defaults");
        }
    }

    apply_env_overrides(&mut rules);

    rules.validate()?;
    Ok(rules)
}

/// Parses a TOML rules document. Missing keys keep their defaults.
pub fn parse_rules(contents: &str) -> CliResult<ReturnRules> {
    Ok(toml::from_str(contents)?)
}

/// Renders rules in the config file format.
pub fn render_rules(rules: &ReturnRules) -> CliResult<String> {
    Ok(toml::to_string_pretty(rules)?)
}

/// Writes rules to `config_path` (or the platform default) and returns the path.
pub fn save_rules(rules: &ReturnRules, config_path: Option<PathBuf>) -> CliResult<PathBuf> {
    let path = config_path
        .or_else(default_config_path)
        .ok_or_else(|| CliError::InvalidConfig("No config path available".into()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&path, render_rules(rules)?)?;
    info!(?path, "Return rules saved");
    Ok(path)
}

/// Returns the default config file path.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "rental", "returns")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Applies process environment overrides.
pub fn apply_env_overrides(rules: &mut ReturnRules) {
    apply_overrides_from(rules, |key| std::env::var(key).ok());
}

/// Applies overrides from any key lookup.
///
/// Values that do not parse are logged and ignored.
pub fn apply_overrides_from<F>(rules: &mut ReturnRules, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(hours) = parsed::<u32, _>(&lookup, ENV_GRACE_PERIOD_HOURS) {
        debug!(hours, "Overriding grace period from environment");
        rules.grace_period_hours = hours;
    }

    if let Some(bps) = parsed::<u32, _>(&lookup, ENV_LATE_FEE_MULTIPLIER_BPS) {
        debug!(bps, "Overriding late fee multiplier from environment");
        rules.late_fee_multiplier = RateMultiplier::from_bps(bps);
    }

    let fees = &mut rules.cleaning_fees;
    for (key, slot) in [
        (ENV_CLEANING_FEE_A, &mut fees.a),
        (ENV_CLEANING_FEE_B, &mut fees.b),
        (ENV_CLEANING_FEE_C, &mut fees.c),
        (ENV_CLEANING_FEE_D, &mut fees.d),
    ] {
        if let Some(cents) = parsed::<i64, _>(&lookup, key) {
            debug!(key, cents, "Overriding cleaning fee from environment");
            *slot = Money::from_cents(cents);
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

/// True when `path` names the stdin placeholder.
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}
