use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::statements::income::IncomeStatement;
use crate::types::{with_metadata, ComputationOutput, Money};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Non-cash and investing items supplied alongside an income statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowInputs {
    /// Depreciation added back to net income
    pub depreciation: Money,
    /// Capital expenditures
    pub capex: Money,
    /// Increase (positive) or decrease (negative) in net working capital
    pub working_capital_change: Money,
}

/// Indirect-method cash flow statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub operating_cash_flow: Money,
    pub investing_cash_flow: Money,
    pub total_cash_flow: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive a cash flow statement from an income statement's net income plus
/// non-cash and investing items. Total function.
pub fn generate_cash_flow_statement(
    income: &IncomeStatement,
    inputs: &CashFlowInputs,
) -> ComputationOutput<CashFlowStatement> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let operating_cash_flow =
        income.net_income + inputs.depreciation - inputs.working_capital_change;
    let investing_cash_flow = -inputs.capex;
    let total_cash_flow = operating_cash_flow + investing_cash_flow;

    let output = CashFlowStatement {
        operating_cash_flow,
        investing_cash_flow,
        total_cash_flow,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Indirect-Method Cash Flow Statement",
        &serde_json::json!({
            "net_income": income.net_income,
            "depreciation": inputs.depreciation,
            "capex": inputs.capex,
            "working_capital_change": inputs.working_capital_change,
        }),
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
