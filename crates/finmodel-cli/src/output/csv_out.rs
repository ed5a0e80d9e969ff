use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// The two-statement payload serializes row-per-record: the header is the
/// union of statement fields in declaration order, one row per statement.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if map.contains_key("income_statement") {
                write_statement_rows(&mut wtr, map);
            } else if let Some(Value::Object(result)) = map.get("result") {
                if let Some(Value::Array(points)) = result.get("points") {
                    write_array_csv(&mut wtr, points);
                } else {
                    write_field_value(&mut wtr, result);
                }
            } else {
                write_field_value(&mut wtr, map);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

/// One row per statement under a header that unions their fields in order.
fn write_statement_rows(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    payload: &serde_json::Map<String, Value>,
) {
    let records: Vec<&serde_json::Map<String, Value>> = payload
        .values()
        .filter_map(|envelope| envelope.get("result"))
        .filter_map(|result| result.as_object())
        .collect();

    let mut headers: Vec<&str> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }

    let _ = wtr.write_record(&headers);
    for record in &records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| record.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn write_field_value(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    map: &serde_json::Map<String, Value>,
) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
