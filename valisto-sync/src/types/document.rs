//! JSON document primitives shared by the store and the engine.

use serde_json::{Map, Value};
use valisto_core::Plan;

/// A schemaless JSON document, keyed by field name.
pub type Document = Map<String, Value>;

/// Read the numeric `stock` field of a product document.
///
/// Missing or non-numeric stock counts as zero; float values are
/// truncated toward zero.
pub fn stock_of(doc: &Document) -> i64 {
    doc.get("stock").and_then(numeric).unwrap_or(0)
}

/// Read the `plan` field of a user or tenant document.
pub fn plan_of(doc: &Document) -> Plan {
    Plan::parse(doc.get("plan").and_then(Value::as_str))
}

pub(crate) fn numeric(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value.as_f64().map(|f| f as i64)
}
