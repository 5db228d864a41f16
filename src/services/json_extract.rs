//! Best-effort recovery of JSON from free-form model output.
//!
//! Models wrap their JSON in prose and code fences often enough that the raw
//! text cannot be trusted to parse. Extraction never fails: when nothing
//! structured can be found the text itself comes back under an `output` key.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// From the first `{` to the last `}`.
static BRACE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("BRACE_BLOCK is a valid regex pattern"));

#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// An object or array recovered from the text.
    Structured(Value),
    /// Nothing structured was found; holds the trimmed text.
    Unstructured(String),
}

impl Extracted {
    pub fn into_value(self) -> Value {
        match self {
            Extracted::Structured(value) => value,
            Extracted::Unstructured(text) => Value::Object(force_object(Value::String(text))),
        }
    }
}

fn parse_container(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(|v| v.is_object() || v.is_array())
}

pub fn extract_structured(raw: &str) -> Extracted {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Extracted::Unstructured(String::new());
    }

    if let Some(value) = parse_container(raw) {
        return Extracted::Structured(value);
    }

    if let Some(value) = BRACE_BLOCK
        .find(raw)
        .and_then(|block| parse_container(block.as_str()))
    {
        return Extracted::Structured(value);
    }

    Extracted::Unstructured(trimmed.to_string())
}

/// Recovers an object or array from `raw`, or `{"output": <trimmed raw>}`.
pub fn extract(raw: &str) -> Value {
    extract_structured(raw).into_value()
}

/// Coerces any parsed value into an object: arrays and scalars go under `output`.
pub fn force_object(value: Value) -> Map<String, Value> {
    let output = match value {
        Value::Object(map) => return map,
        Value::Array(_) | Value::String(_) => value,
        scalar => Value::String(scalar.to_string()),
    };
    let mut map = Map::new();
    map.insert("output".to_string(), output);
    map
}
