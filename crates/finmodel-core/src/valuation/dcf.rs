use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

use crate::error::FinModelError;
use crate::types::{with_metadata, ComputationOutput, Money, ProjectionPeriod, Rate};
use crate::FinModelResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a Discounted Cash Flow valuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcfInput {
    /// Projected cash flow per future period, period 1 first
    pub cash_flows: Vec<Money>,
    /// Rate used to discount future cash flows to present value
    pub discount_rate: Rate,
    /// Perpetual growth rate assumed beyond the forecast horizon
    pub terminal_growth_rate: Rate,
}

/// One discounted forecast period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountedPeriod {
    pub period: ProjectionPeriod,
    pub cash_flow: Money,
    pub discount_factor: Rate,
    pub present_value: Money,
}

/// Output of the DCF valuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcfOutput {
    /// Period-by-period discounting breakdown
    pub periods: Vec<DiscountedPeriod>,
    /// Sum of present values of the explicit forecast
    pub pv_of_cash_flows: Money,
    /// Gordon-growth terminal value from the last forecast period
    pub terminal_value: Money,
    /// Terminal value discounted to present
    pub pv_of_terminal: Money,
    /// Present value of the forecast plus discounted terminal value
    pub dcf_value: Money,
    /// Discounted terminal value as a share of the total
    pub terminal_value_pct: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Present value of an explicit forecast plus a Gordon-growth terminal value.
///
/// The raw engine behind [`calculate_dcf`] and the sensitivity sweep: same
/// validation, no envelope, no breakdown.
pub fn dcf_value(
    cash_flows: &[Money],
    discount_rate: Rate,
    terminal_growth_rate: Rate,
) -> FinModelResult<Money> {
    let last_cf = *cash_flows.last().ok_or_else(empty_forecast)?;
    validate_rates(discount_rate, terminal_growth_rate)?;

    let one_plus_r = Decimal::ONE + discount_rate;
    let mut compound = Decimal::ONE;
    let mut pv = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        compound *= one_plus_r;
        if compound.is_zero() {
            return Err(FinModelError::DivisionByZero {
                context: format!("discount factor at period {}", t + 1),
            });
        }
        pv += cf / compound;
    }

    // Terminal value grows the final period forward one year and capitalises
    // it at the rate spread; a negative spread is propagated, not rejected.
    let terminal_value =
        last_cf * (Decimal::ONE + terminal_growth_rate) / (discount_rate - terminal_growth_rate);
    Ok(pv + terminal_value / compound)
}

/// Run a DCF valuation with a period-by-period breakdown.
pub fn calculate_dcf(input: &DcfInput) -> FinModelResult<ComputationOutput<DcfOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let last_cf = *input.cash_flows.last().ok_or_else(empty_forecast)?;
    validate_rates(input.discount_rate, input.terminal_growth_rate)?;

    let one_plus_r = Decimal::ONE + input.discount_rate;
    let mut compound = Decimal::ONE;
    let mut periods = Vec::with_capacity(input.cash_flows.len());
    let mut pv_of_cash_flows = Decimal::ZERO;

    for (idx, &cf) in input.cash_flows.iter().enumerate() {
        let year = (idx + 1) as i32;
        compound *= one_plus_r;
        if compound.is_zero() {
            return Err(FinModelError::DivisionByZero {
                context: format!("discount factor at period {year}"),
            });
        }
        let present_value = cf / compound;
        pv_of_cash_flows += present_value;

        periods.push(DiscountedPeriod {
            period: ProjectionPeriod {
                year,
                label: format!("Year {year}"),
                is_terminal: false,
            },
            cash_flow: cf,
            discount_factor: Decimal::ONE / compound,
            present_value,
        });
    }

    let terminal_value = last_cf * (Decimal::ONE + input.terminal_growth_rate)
        / (input.discount_rate - input.terminal_growth_rate);
    let pv_of_terminal = terminal_value / compound;
    let dcf_value = pv_of_cash_flows + pv_of_terminal;

    if terminal_value < Decimal::ZERO {
        warnings.push(format!(
            "Terminal value is negative: discount rate {} is below terminal growth rate {}",
            input.discount_rate, input.terminal_growth_rate
        ));
    }

    let terminal_value_pct = if dcf_value.is_zero() {
        Decimal::ZERO
    } else {
        pv_of_terminal / dcf_value
    };
    if terminal_value_pct > dec!(0.75) {
        warnings.push(format!(
            "Terminal value represents {:.1}% of the valuation; consider extending the explicit forecast",
            terminal_value_pct * dec!(100)
        ));
    }

    let output = DcfOutput {
        periods,
        pv_of_cash_flows,
        terminal_value,
        pv_of_terminal,
        dcf_value,
        terminal_value_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Gordon-Growth DCF",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Parse a comma-separated forecast string into cash flows.
///
/// Tokens are trimmed and empty tokens discarded; anything left must parse
/// as a decimal, and at least one period must remain.
pub fn parse_forecast(raw: &str) -> FinModelResult<Vec<Money>> {
    let mut flows = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let value = Decimal::from_str(token).map_err(|e| FinModelError::InvalidInput {
            field: "cash_flow_forecast".into(),
            reason: format!("invalid forecast entry '{token}': {e}"),
        })?;
        flows.push(value);
    }
    if flows.is_empty() {
        return Err(empty_forecast());
    }
    Ok(flows)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn empty_forecast() -> FinModelError {
    FinModelError::InvalidInput {
        field: "cash_flows".into(),
        reason: "forecast must contain at least one period".into(),
    }
}

fn validate_rates(discount_rate: Rate, terminal_growth_rate: Rate) -> FinModelResult<()> {
    if discount_rate == terminal_growth_rate {
        return Err(FinModelError::DivisionByZero {
            context: "terminal value: discount rate and terminal growth rate must not be equal"
                .into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> DcfInput {
        DcfInput {
            cash_flows: vec![dec!(100000), dec!(110000), dec!(121000), dec!(133100)],
            discount_rate: dec!(0.10),
            terminal_growth_rate: dec!(0.02),
        }
    }

    #[test]
    fn test_dcf_known_value() {
        let result = calculate_dcf(&sample_input()).unwrap();
        let out = &result.result;

        // 363,636.36 explicit PV + 1,159,090.91 discounted terminal value
        assert!((out.pv_of_cash_flows - dec!(363636.3636)).abs() < dec!(0.01));
        assert_eq!(out.terminal_value, dec!(1697025));
        assert!((out.pv_of_terminal - dec!(1159090.9091)).abs() < dec!(0.01));
        assert!((out.dcf_value - dec!(1522727.2727)).abs() < dec!(0.01));
    }

    #[test]
    fn test_dcf_value_matches_breakdown() {
        let input = sample_input();
        let scalar = dcf_value(
            &input.cash_flows,
            input.discount_rate,
            input.terminal_growth_rate,
        )
        .unwrap();
        let full = calculate_dcf(&input).unwrap();

        assert_eq!(scalar, full.result.dcf_value);
    }

    #[test]
    fn test_dcf_period_breakdown() {
        let result = calculate_dcf(&sample_input()).unwrap();
        let out = &result.result;

        assert_eq!(out.periods.len(), 4);
        assert_eq!(out.periods[0].period.year, 1);
        assert_eq!(out.periods[3].period.label, "Year 4");
        // This forecast grows at exactly the discount rate, so every period
        // discounts to the same present value
        for p in &out.periods {
            assert!((p.present_value - dec!(90909.0909)).abs() < dec!(0.01));
        }
    }

    #[test]
    fn test_equal_rates_rejected() {
        let mut input = sample_input();
        input.terminal_growth_rate = dec!(0.10);

        let err = calculate_dcf(&input).unwrap_err();
        assert!(matches!(err, FinModelError::DivisionByZero { .. }));
        assert!(err.to_string().contains("must not be equal"));

        let err = dcf_value(&input.cash_flows, dec!(0.05), dec!(0.05)).unwrap_err();
        assert!(matches!(err, FinModelError::DivisionByZero { .. }));
    }

    #[test]
    fn test_empty_forecast_rejected() {
        let input = DcfInput {
            cash_flows: vec![],
            discount_rate: dec!(0.10),
            terminal_growth_rate: dec!(0.02),
        };

        let err = calculate_dcf(&input).unwrap_err();
        assert!(matches!(err, FinModelError::InvalidInput { .. }));
        assert!(err.to_string().contains("at least one period"));
    }

    #[test]
    fn test_negative_terminal_value_propagates() {
        // Growth above the discount rate: economically nonsensical but valid
        let result = calculate_dcf(&DcfInput {
            cash_flows: vec![dec!(100)],
            discount_rate: dec!(0.02),
            terminal_growth_rate: dec!(0.05),
        })
        .unwrap();
        let out = &result.result;

        // (100 - 3500) / 1.02
        assert!((out.dcf_value - dec!(-3333.3333)).abs() < dec!(0.01));
        assert!(out.terminal_value < Decimal::ZERO);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("Terminal value is negative")));
    }

    #[test]
    fn test_monotonic_in_discount_rate() {
        let cfs = sample_input().cash_flows;
        let g = dec!(0.02);

        let v1 = dcf_value(&cfs, dec!(0.08), g).unwrap();
        let v2 = dcf_value(&cfs, dec!(0.10), g).unwrap();
        let v3 = dcf_value(&cfs, dec!(0.12), g).unwrap();

        assert!(v1 > v2);
        assert!(v2 > v3);
    }

    #[test]
    fn test_single_period_forecast() {
        let value = dcf_value(&[dec!(1000)], dec!(0.10), dec!(0.02)).unwrap();
        // 1000/1.1 + (1000 * 1.02 / 0.08) / 1.1
        let expected = dec!(1000) / dec!(1.1) + dec!(12750) / dec!(1.1);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_minus_one_discount_rate() {
        let err = dcf_value(&[dec!(100)], dec!(-1), dec!(0.02)).unwrap_err();
        assert!(matches!(err, FinModelError::DivisionByZero { .. }));
    }

    #[test]
    fn test_terminal_value_pct_bounds() {
        let result = calculate_dcf(&sample_input()).unwrap();
        let out = &result.result;

        assert!(out.terminal_value_pct > Decimal::ZERO);
        assert!(out.terminal_value_pct < Decimal::ONE);
    }

    #[test]
    fn test_parse_forecast() {
        let flows = parse_forecast("100000, 110000 ,121000,,133100").unwrap();
        assert_eq!(
            flows,
            vec![dec!(100000), dec!(110000), dec!(121000), dec!(133100)]
        );
    }

    #[test]
    fn test_parse_forecast_negative_and_decimal() {
        let flows = parse_forecast("-500.25, 1000").unwrap();
        assert_eq!(flows, vec![dec!(-500.25), dec!(1000)]);
    }

    #[test]
    fn test_parse_forecast_bad_token() {
        let err = parse_forecast("100000, abc, 121000").unwrap_err();
        assert!(matches!(err, FinModelError::InvalidInput { .. }));
        assert!(err.to_string().contains("invalid forecast entry 'abc'"));
    }

    #[test]
    fn test_parse_forecast_empty() {
        for raw in ["", "   ", ", ,"] {
            let err = parse_forecast(raw).unwrap_err();
            assert!(err.to_string().contains("at least one period"));
        }
    }
}
