use serde_json::Value;

use super::{flatten, format_cell};

/// Key outputs in priority order, matched against dotted field names.
const PRIORITY_KEYS: [&str; 5] = [
    "liability.cit_liability",
    "records_processed",
    "net_taxable_profit",
    "used_loss_total",
    "loss_carryforward_years",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", minimal_answer(result_obj));
}

fn minimal_answer(result: &Value) -> String {
    if !result.is_object() {
        return format_cell(result);
    }

    let fields = flatten(result);
    for key in PRIORITY_KEYS {
        if let Some((_, val)) = fields.iter().find(|(k, v)| k == key && !v.is_null()) {
            return format_cell(val);
        }
    }

    match fields.first() {
        Some((key, val)) => format!("{}: {}", key, format_cell(val)),
        None => String::new(),
    }
}
