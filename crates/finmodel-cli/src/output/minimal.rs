use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Print just the key answer value from the output.
///
/// Currency figures are rendered with thousands separators and two decimals;
/// rates as percentages.
pub fn print_minimal(value: &Value) {
    // The two-statement payload nests envelopes one level down
    if let Some(cash_flow) = value.get("cash_flow_statement") {
        print_minimal(cash_flow);
        return;
    }

    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // A sensitivity series prints one point per line
    if let Some(Value::Array(points)) = result_obj.get("points") {
        for point in points {
            let rate = point.get("parameter_value").map(format_rate).unwrap_or_default();
            let valuation = point.get("valuation").map(format_figure).unwrap_or_default();
            println!("{} {}", rate, valuation);
        }
        return;
    }

    // Priority list of key output fields
    let priority_keys = ["dcf_value", "total_cash_flow", "net_income"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_figure(val));
                    return;
                }
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_figure(val));
            return;
        }
    }

    println!("{}", format_plain(result_obj));
}

/// Render a value as currency when it carries a decimal figure.
fn format_figure(value: &Value) -> String {
    match decimal_of(value) {
        Some(d) => format_currency(d),
        None => format_plain(value),
    }
}

/// Render a fractional rate as a percentage, e.g. `0.05` → `5%`.
fn format_rate(value: &Value) -> String {
    match decimal_of(value) {
        Some(d) => format!("{}%", (d * Decimal::ONE_HUNDRED).normalize()),
        None => format_plain(value),
    }
}

fn format_plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Money travels as decimal strings on the wire; numbers are accepted too.
fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// `1234567.891` → `$1,234,567.89`
fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative();
    let s = rounded.abs().to_string();

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i.to_string(), format!("{:0<2}", f)),
        None => (s, "00".to_string()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let int_grouped: String = grouped.chars().rev().collect();

    let sign = if negative { "-" } else { "" };
    format!("{}${}.{}", sign, int_grouped, frac_part)
}
