use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, format_cell, is_row_array};

/// Format output as tables using the tabled crate.
///
/// Scalar fields of the result go into one Field/Value table with dotted
/// section names; each array of objects (population records, failures,
/// bracket slices) gets its own grid.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result_tables(result, map),
            None => print_field_table(&flatten(value)),
        },
        Value::Array(arr) => print_grid(arr),
        _ => println!("{}", value),
    }
}

fn print_result_tables(result: &Value, envelope: &Map<String, Value>) {
    let (grids, fields): (Vec<_>, Vec<_>) = flatten(result)
        .into_iter()
        .partition(|(_, v)| is_row_array(v));

    if !fields.is_empty() {
        print_field_table(&fields);
    }
    for (name, rows) in grids {
        if let Value::Array(arr) = rows {
            println!("\n{}:", name);
            print_grid(&arr);
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(rows: &[(String, Value)]) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in rows {
        builder.push_record([key.clone(), format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_grid(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(first) = arr.first().filter(|v| v.is_object()) {
        let headers: Vec<String> = flatten(first).into_iter().map(|(k, _)| k).collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            let cells = flatten(item);
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    cells
                        .iter()
                        .find(|(k, _)| k == h)
                        .map(|(_, v)| format_cell(v))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(row);
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_cell(item));
        }
    }
}
