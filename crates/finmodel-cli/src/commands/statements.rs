use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use finmodel_core::statements::cash_flow::{self, CashFlowInputs};
use finmodel_core::statements::income::{self, FinancialAssumptions};

use crate::input;

/// Arguments for income statement derivation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct IncomeArgs {
    /// Total revenue for the period (e.g. 500000)
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Cost of goods sold (e.g. 300000)
    #[arg(long)]
    pub cogs: Option<Decimal>,

    /// Operating expenses (e.g. 100000)
    #[arg(long, alias = "opex")]
    pub operating_expenses: Option<Decimal>,

    /// Flat tax rate as a fraction (e.g. 0.20 for 20%)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the statement pipeline (income + cash flow)
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CashFlowArgs {
    #[command(flatten)]
    pub income: IncomeArgs,

    /// Depreciation added back to net income (e.g. 20000)
    #[arg(long)]
    pub depreciation: Option<Decimal>,

    /// Capital expenditures (e.g. 30000)
    #[arg(long)]
    pub capex: Option<Decimal>,

    /// Change in net working capital (e.g. 5000)
    #[arg(long, alias = "wc-change")]
    pub working_capital_change: Option<Decimal>,
}

/// JSON shape for the `cash-flow` subcommand's `--input` file.
#[derive(Deserialize)]
struct CashFlowRequest {
    #[serde(flatten)]
    assumptions: FinancialAssumptions,
    depreciation: Decimal,
    capex: Decimal,
    working_capital_change: Decimal,
}

fn resolve_assumptions(
    args: &IncomeArgs,
) -> Result<FinancialAssumptions, Box<dyn std::error::Error>> {
    Ok(FinancialAssumptions {
        revenue: args
            .revenue
            .ok_or("--revenue is required (or provide --input)")?,
        cogs: args.cogs.ok_or("--cogs is required (or provide --input)")?,
        operating_expenses: args
            .operating_expenses
            .ok_or("--operating-expenses is required (or provide --input)")?,
        tax_rate: args
            .tax_rate
            .ok_or("--tax-rate is required (or provide --input)")?,
    })
}

pub fn run_income(args: IncomeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions: FinancialAssumptions = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        resolve_assumptions(&args)?
    };

    let result = income::calculate_income_statement(&assumptions);
    Ok(serde_json::to_value(result)?)
}

pub fn run_cash_flow(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (assumptions, cf_inputs) = if let Some(ref path) = args.income.input {
        let request: CashFlowRequest = input::file::read_json(path)?;
        split_request(request)
    } else if let Some(data) = input::stdin::read_stdin()? {
        let request: CashFlowRequest = serde_json::from_value(data)?;
        split_request(request)
    } else {
        (
            resolve_assumptions(&args.income)?,
            CashFlowInputs {
                depreciation: args
                    .depreciation
                    .ok_or("--depreciation is required (or provide --input)")?,
                capex: args.capex.ok_or("--capex is required (or provide --input)")?,
                working_capital_change: args
                    .working_capital_change
                    .ok_or("--working-capital-change is required (or provide --input)")?,
            },
        )
    };

    // Straight pipeline: net income feeds the cash flow statement
    let income_statement = income::calculate_income_statement(&assumptions);
    let cash_flow_statement =
        cash_flow::generate_cash_flow_statement(&income_statement.result, &cf_inputs);

    Ok(serde_json::json!({
        "income_statement": income_statement,
        "cash_flow_statement": cash_flow_statement,
    }))
}

fn split_request(request: CashFlowRequest) -> (FinancialAssumptions, CashFlowInputs) {
    (
        request.assumptions,
        CashFlowInputs {
            depreciation: request.depreciation,
            capex: request.capex,
            working_capital_change: request.working_capital_change,
        },
    )
}
