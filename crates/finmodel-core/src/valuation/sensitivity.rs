use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinModelError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, SweepRange};
use crate::valuation::dcf;
use crate::FinModelResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which valuation parameter a sweep varies. The other one is held fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    DiscountRate,
    TerminalGrowthRate,
}

impl SweepAxis {
    /// Conventional sweep range for the axis.
    pub fn default_range(self) -> SweepRange {
        match self {
            SweepAxis::DiscountRate => SweepRange {
                start: dec!(0.05),
                stop: dec!(0.20),
                step: dec!(0.01),
            },
            SweepAxis::TerminalGrowthRate => SweepRange {
                start: dec!(0.01),
                stop: dec!(0.05),
                step: dec!(0.005),
            },
        }
    }

    fn variable_name(self) -> &'static str {
        match self {
            SweepAxis::DiscountRate => "discount_rate",
            SweepAxis::TerminalGrowthRate => "terminal_growth_rate",
        }
    }
}

/// Input for a one-way DCF sensitivity sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Forecast shared by every valuation in the sweep; read-only throughout
    pub cash_flows: Vec<Money>,
    /// Swept parameter
    pub axis: SweepAxis,
    /// Value held fixed for the parameter that is not swept
    pub fixed_rate: Rate,
    /// Overrides the conventional range for the axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SweepRange>,
}

/// One (swept value, valuation) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub parameter_value: Decimal,
    pub valuation: Money,
}

/// Output of a sensitivity sweep, points in ascending sweep order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub axis: SweepAxis,
    pub fixed_rate: Rate,
    pub points: Vec<SensitivityPoint>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Sweep one valuation parameter over a half-open range, valuing the same
/// forecast at every step.
///
/// The first failing valuation aborts the whole sweep: a partial series is
/// never returned, and the error names the swept value that triggered it.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> FinModelResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    if input.cash_flows.is_empty() {
        return Err(FinModelError::InvalidInput {
            field: "cash_flows".into(),
            reason: "forecast must contain at least one period".into(),
        });
    }

    let range = input
        .range
        .clone()
        .unwrap_or_else(|| input.axis.default_range());
    let values = sweep_values(&range)?;

    let mut points = Vec::with_capacity(values.len());
    for &value in &values {
        let (discount_rate, terminal_growth_rate) = match input.axis {
            SweepAxis::DiscountRate => (value, input.fixed_rate),
            SweepAxis::TerminalGrowthRate => (input.fixed_rate, value),
        };
        let valuation = dcf::dcf_value(&input.cash_flows, discount_rate, terminal_growth_rate)
            .map_err(|e| FinModelError::SweepFailure {
                variable: input.axis.variable_name().into(),
                value,
                reason: e.to_string(),
            })?;
        points.push(SensitivityPoint {
            parameter_value: value,
            valuation,
        });
    }

    let output = SensitivityOutput {
        axis: input.axis,
        fixed_rate: input.fixed_rate,
        points,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "One-Way DCF Sensitivity Sweep",
        &serde_json::json!({
            "axis": input.axis,
            "fixed_rate": input.fixed_rate,
            "range": range,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Generate the swept values for `[start, stop)` in ascending order.
fn sweep_values(range: &SweepRange) -> FinModelResult<Vec<Decimal>> {
    if range.step <= Decimal::ZERO {
        return Err(FinModelError::InvalidInput {
            field: "range.step".into(),
            reason: "Step must be positive".into(),
        });
    }
    if range.start >= range.stop {
        return Err(FinModelError::InvalidInput {
            field: "range".into(),
            reason: "Start must be below stop".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = range.start;
    while current < range.stop {
        values.push(current);
        current += range.step;
    }
    Ok(values)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input(axis: SweepAxis, fixed_rate: Decimal) -> SensitivityInput {
        SensitivityInput {
            cash_flows: vec![dec!(100000), dec!(110000), dec!(121000), dec!(133100)],
            axis,
            fixed_rate,
            range: None,
        }
    }

    #[test]
    fn test_discount_rate_sweep_default_range() {
        let input = sample_input(SweepAxis::DiscountRate, dec!(0.02));
        let result = run_sensitivity(&input).unwrap();
        let out = &result.result;

        // [0.05, 0.20) step 0.01
        assert_eq!(out.points.len(), 15);
        assert_eq!(out.points[0].parameter_value, dec!(0.05));
        assert_eq!(out.points[14].parameter_value, dec!(0.19));

        // Each point matches a direct valuation at that rate
        for p in &out.points {
            let direct =
                dcf::dcf_value(&input.cash_flows, p.parameter_value, dec!(0.02)).unwrap();
            assert_eq!(p.valuation, direct);
        }
    }

    #[test]
    fn test_discount_sweep_is_monotonically_decreasing() {
        let input = sample_input(SweepAxis::DiscountRate, dec!(0.02));
        let result = run_sensitivity(&input).unwrap();
        let points = &result.result.points;

        for pair in points.windows(2) {
            assert!(pair[0].valuation > pair[1].valuation);
        }
    }

    #[test]
    fn test_growth_rate_sweep_default_range() {
        let input = sample_input(SweepAxis::TerminalGrowthRate, dec!(0.10));
        let result = run_sensitivity(&input).unwrap();
        let out = &result.result;

        // [0.01, 0.05) step 0.005
        assert_eq!(out.points.len(), 8);
        assert_eq!(out.points[0].parameter_value, dec!(0.01));
        assert_eq!(out.points[7].parameter_value, dec!(0.045));

        // Valuation rises with the assumed perpetual growth
        for pair in out.points.windows(2) {
            assert!(pair[0].valuation < pair[1].valuation);
        }
    }

    #[test]
    fn test_sweep_aborts_on_rate_collision() {
        // Growth sweep crosses the fixed discount rate at 0.03
        let input = sample_input(SweepAxis::TerminalGrowthRate, dec!(0.03));
        let err = run_sensitivity(&input).unwrap_err();

        match err {
            FinModelError::SweepFailure {
                variable,
                value,
                reason,
            } => {
                assert_eq!(variable, "terminal_growth_rate");
                assert_eq!(value, dec!(0.03));
                assert!(reason.contains("must not be equal"));
            }
            other => panic!("expected SweepFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_range() {
        let mut input = sample_input(SweepAxis::DiscountRate, dec!(0.02));
        input.range = Some(SweepRange {
            start: dec!(0.08),
            stop: dec!(0.11),
            step: dec!(0.01),
        });

        let result = run_sensitivity(&input).unwrap();
        let values: Vec<Decimal> = result
            .result
            .points
            .iter()
            .map(|p| p.parameter_value)
            .collect();
        // Stop is exclusive
        assert_eq!(values, vec![dec!(0.08), dec!(0.09), dec!(0.10)]);
    }

    #[test]
    fn test_invalid_step() {
        let mut input = sample_input(SweepAxis::DiscountRate, dec!(0.02));
        input.range = Some(SweepRange {
            start: dec!(0.05),
            stop: dec!(0.20),
            step: Decimal::ZERO,
        });

        let err = run_sensitivity(&input).unwrap_err();
        assert!(matches!(err, FinModelError::InvalidInput { .. }));
    }

    #[test]
    fn test_inverted_range() {
        let mut input = sample_input(SweepAxis::DiscountRate, dec!(0.02));
        input.range = Some(SweepRange {
            start: dec!(0.20),
            stop: dec!(0.05),
            step: dec!(0.01),
        });

        assert!(run_sensitivity(&input).is_err());
    }

    #[test]
    fn test_empty_forecast_rejected_before_sweep() {
        let input = SensitivityInput {
            cash_flows: vec![],
            axis: SweepAxis::DiscountRate,
            fixed_rate: dec!(0.02),
            range: None,
        };

        let err = run_sensitivity(&input).unwrap_err();
        assert!(matches!(err, FinModelError::InvalidInput { .. }));
    }
}
