use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use finmodel_core::types::SweepRange;
use finmodel_core::valuation::dcf::{self, DcfInput};
use finmodel_core::valuation::sensitivity::{self, SensitivityInput, SweepAxis};

use crate::input;

/// Arguments for DCF valuation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DcfArgs {
    /// Comma-separated cash flow forecast, period 1 first
    /// (e.g. "100000, 110000, 121000, 133100")
    #[arg(long)]
    pub forecast: Option<String>,

    /// Rate used to discount future cash flows (e.g. 0.10 for 10%)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Perpetual growth rate beyond the forecast horizon (e.g. 0.02)
    #[arg(long, alias = "terminal-growth")]
    pub terminal_growth_rate: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a one-way sensitivity sweep
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SensitivityArgs {
    /// Comma-separated cash flow forecast, period 1 first
    #[arg(long)]
    pub forecast: Option<String>,

    /// Parameter to sweep; the other is held at --fixed-rate
    #[arg(long, value_enum)]
    pub axis: Option<AxisArg>,

    /// Value held fixed for the parameter that is not swept
    #[arg(long)]
    pub fixed_rate: Option<Decimal>,

    /// Sweep range as start:stop:step, stop exclusive
    /// (e.g. "0.05:0.20:0.01"); defaults to the conventional range per axis
    #[arg(long)]
    pub range: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AxisArg {
    /// Sweep the discount rate, holding terminal growth fixed
    DiscountRate,
    /// Sweep the terminal growth rate, holding the discount rate fixed
    GrowthRate,
}

impl From<AxisArg> for SweepAxis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::DiscountRate => SweepAxis::DiscountRate,
            AxisArg::GrowthRate => SweepAxis::TerminalGrowthRate,
        }
    }
}

fn parse_range(spec: &str) -> Result<SweepRange, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Sweep range must be start:stop:step, got '{spec}'").into());
    }
    Ok(SweepRange {
        start: parts[0].trim().parse()?,
        stop: parts[1].trim().parse()?,
        step: parts[2].trim().parse()?,
    })
}

pub fn run_dcf(args: DcfArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dcf_input: DcfInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let raw = args
            .forecast
            .ok_or("--forecast is required (or provide --input)")?;
        DcfInput {
            cash_flows: dcf::parse_forecast(&raw)?,
            discount_rate: args
                .discount_rate
                .ok_or("--discount-rate is required (or provide --input)")?,
            terminal_growth_rate: args
                .terminal_growth_rate
                .ok_or("--terminal-growth-rate is required (or provide --input)")?,
        }
    };

    let result = dcf::calculate_dcf(&dcf_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sens_input: SensitivityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let raw = args
            .forecast
            .ok_or("--forecast is required (or provide --input)")?;
        let axis = args.axis.ok_or("--axis is required (or provide --input)")?;
        SensitivityInput {
            cash_flows: dcf::parse_forecast(&raw)?,
            axis: axis.into(),
            fixed_rate: args
                .fixed_rate
                .ok_or("--fixed-rate is required (or provide --input)")?,
            range: args.range.as_deref().map(parse_range).transpose()?,
        }
    };

    let result = sensitivity::run_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}
