//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! JSON is the size baseline this codec competes with, and the bridge is
//! what benchmark and import/export call sites use. Arrays map to pure
//! array-part tables; objects map to pure hash-part tables with string
//! keys. Byte buffers have no JSON form, so they travel as
//! `data:application/octet-stream;base64,` strings.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::value::{Table, Value};

const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => match s.strip_prefix(DATA_URI_PREFIX) {
                Some(b64) => match BASE64.decode(b64) {
                    Ok(bytes) => Value::Bytes(bytes),
                    Err(_) => Value::Str(s),
                },
                None => Value::Str(s),
            },
            serde_json::Value::Array(arr) => {
                Value::Table(Table::from_array(arr.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(obj) => {
                let mut table = Table::new();
                for (k, v) in obj {
                    table.insert(Value::Str(k), Value::from(v));
                }
                Value::Table(table)
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::json!(i),
            Value::Float(f) => serde_json::json!(f),
            Value::Str(s) => serde_json::Value::String(s),
            Value::Bytes(b) => {
                serde_json::Value::String(format!("{DATA_URI_PREFIX}{}", BASE64.encode(b)))
            }
            Value::Table(t) => table_to_json(t),
        }
    }
}

fn table_to_json(table: Table) -> serde_json::Value {
    if table.hash().is_empty() {
        let items = table
            .array()
            .iter()
            .cloned()
            .map(serde_json::Value::from)
            .collect();
        return serde_json::Value::Array(items);
    }
    // Mixed tables flatten to an object; array entries keep their
    // 1-based index as the key, the way script hosts print them.
    let mut obj = serde_json::Map::new();
    for (i, item) in table.array().iter().enumerate() {
        obj.insert((i + 1).to_string(), serde_json::Value::from(item.clone()));
    }
    for (key, value) in table.hash() {
        let key = match key {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        };
        obj.insert(key, serde_json::Value::from(value.clone()));
    }
    serde_json::Value::Object(obj)
}
