use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Operating assumptions behind a single-period income statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialAssumptions {
    /// Total revenue for the period
    pub revenue: Money,
    /// Cost of goods sold
    pub cogs: Money,
    /// Operating expenses (SG&A, R&D, other opex)
    pub operating_expenses: Money,
    /// Flat tax rate applied to operating income
    pub tax_rate: Rate,
}

/// Derived income statement. Every field is a function of the assumptions;
/// field order is the export row order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub revenue: Money,
    pub cogs: Money,
    pub gross_profit: Money,
    pub operating_expenses: Money,
    pub operating_income: Money,
    pub net_income: Money,
    /// Tax rate echoed back as a percentage
    pub tax_rate_pct: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive a single-period income statement from operating assumptions.
///
/// Total over all decimal inputs: out-of-domain assumptions (negative
/// amounts, tax rate outside [0, 1]) are reported as warnings and the
/// statement is still computed as given.
pub fn calculate_income_statement(
    input: &FinancialAssumptions,
) -> ComputationOutput<IncomeStatement> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.revenue < Decimal::ZERO
        || input.cogs < Decimal::ZERO
        || input.operating_expenses < Decimal::ZERO
    {
        warnings.push("Negative revenue, COGS or operating expenses".to_string());
    }
    if input.tax_rate < Decimal::ZERO || input.tax_rate > Decimal::ONE {
        warnings.push(format!("Tax rate {} outside [0, 1]", input.tax_rate));
    }

    let gross_profit = input.revenue - input.cogs;
    let operating_income = gross_profit - input.operating_expenses;
    let net_income = operating_income * (Decimal::ONE - input.tax_rate);

    let output = IncomeStatement {
        revenue: input.revenue,
        cogs: input.cogs,
        gross_profit,
        operating_expenses: input.operating_expenses,
        operating_income,
        net_income,
        tax_rate_pct: input.tax_rate * dec!(100),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Single-Period Income Statement",
        input,
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
