//! JSON interop for host applications
//!
//! Hosts frequently hold the data they want to expose as `serde_json`
//! values; these conversions build the corresponding script values without
//! going through the import pipeline. JSON objects become read-write
//! property stores.

use std::rc::Rc;

use crate::object::ScriptObject;
use crate::value::Value;

/// Build a script value from a JSON value.
///
/// Integral JSON numbers become `Int`, all others `Float`. Object keys that
/// are empty strings have no member representation and are dropped.
pub fn value_from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Array(items) => {
            Value::array(items.iter().map(value_from_json).collect())
        }
        serde_json::Value::Object(map) => {
            let obj = ScriptObject::with_capacity(map.len());
            for (key, item) in map {
                if key.is_empty() {
                    continue;
                }
                // fresh store, no locks to respect
                let _ = obj.hard_set(key, value_from_json(item), false);
            }
            Value::Object(Rc::new(obj))
        }
    }
}

/// Render a script value as JSON.
///
/// `Unit` and callables have no JSON form and become `null`; non-finite
/// floats follow the same rule.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Unit | Value::Null => serde_json::Value::Null,
        Value::Bool(b) => (*b).into(),
        Value::Int(n) => (*n).into(),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => s.as_str().into(),
        Value::Array(items) => {
            serde_json::Value::Array(items.borrow().iter().map(value_to_json).collect())
        }
        Value::Object(obj) => {
            let mut map = serde_json::Map::new();
            for (name, slot) in obj.entries() {
                map.insert(name.as_str().to_string(), value_to_json(&slot.value));
            }
            serde_json::Value::Object(map)
        }
        Value::Function(_) => serde_json::Value::Null,
    }
}
