//! # Commands
//!
//! The work behind each `rental-returns` subcommand. Input is JSON, output
//! is JSON (or TOML for rules); these functions never print, so they can be
//! driven from tests with plain strings.
//!
//! ```text
//! calculate:  ReturnLineInput ──► calculate() ──► LineReport
//! summary:    ReturnRequest   ──► settle_return() ──► ReturnSettlement
//! rules:      ReturnRules     ──► TOML
//! ```

use std::io::Read;
use std::path::Path;

use rental_core::{
    calculate, settle_return, OutstandingRental, RecommendedAction, ReturnCalculation,
    ReturnLineInput, ReturnRules, ReturnSettlement, Settlement,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::is_stdin;
use crate::error::{CliError, CliResult};

// =============================================================================
// Wire Types
// =============================================================================

/// Body of a `summary` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnRequest {
    pub lines: Vec<ReturnLineInput>,
    /// Every line still out on the transaction, including ones not being
    /// returned now. Defaults to the rentals of `lines`.
    #[serde(default)]
    pub outstanding: Option<Vec<OutstandingRental>>,
}

/// Output of `calculate`: the settlement plus what the wizard shows next to it.
#[derive(Debug, Clone, Serialize)]
pub struct LineReport {
    #[serde(flatten)]
    pub calculation: ReturnCalculation,
    pub settlement: Settlement,
    pub recommended_action: RecommendedAction,
}

// =============================================================================
// Input / Output
// =============================================================================

/// Reads a request body from a file, or from stdin when the path is `-`.
pub fn read_input(path: &Path) -> CliResult<String> {
    if is_stdin(path) {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

pub fn render_json<T: Serialize>(value: &T, pretty: bool) -> CliResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

// =============================================================================
// Commands
// =============================================================================

/// Settles a single return line.
pub fn calculate_line(body: &str, rules: &ReturnRules) -> CliResult<LineReport> {
    let input: ReturnLineInput = serde_json::from_str(body)?;
    let calculation = calculate(&input.rental, &input.context, &input.overrides, rules)?;

    info!(
        line = %calculation.transaction_line_id,
        net_refund = %calculation.net_refund,
        "Calculated return line"
    );

    Ok(LineReport {
        settlement: calculation.settlement(),
        recommended_action: input.context.recommended_action(),
        calculation,
    })
}

/// Settles a whole multi-line return.
pub fn summarize_return(body: &str, rules: &ReturnRules) -> CliResult<ReturnSettlement> {
    let request: ReturnRequest = serde_json::from_str(body)?;
    if request.lines.is_empty() {
        return Err(CliError::InvalidRequest(
            "summary request must contain at least one line".into(),
        ));
    }
    Ok(settle_return(
        &request.lines,
        request.outstanding.as_deref(),
        rules,
    )?)
}
