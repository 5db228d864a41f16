use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PLACEHOLDER_OPTIONS: [&str; 4] = ["A", "B", "C", "D"];
pub const PLACEHOLDER_ANSWER: &str = "A";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub q: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Loose view of one entry of the model's `questions` array.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuestionFields {
    q: Option<Value>,
    question: Option<Value>,
    options: Option<Value>,
    answer: Option<Value>,
}

impl QuizQuestion {
    /// Decodes a single model-produced entry. Returns `None` for anything that is
    /// not an object or has no usable question text.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        if !entry.is_object() {
            return None;
        }
        let fields = QuestionFields::deserialize(entry).ok()?;

        let q = [fields.q.as_ref(), fields.question.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|s| !s.is_empty())?
            .to_string();

        let options = match fields.options {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            _ => Vec::new(),
        };

        let answer = fields
            .answer
            .as_ref()
            .and_then(scalar_text)
            .map(|a| a.trim().to_string())
            .unwrap_or_default();

        Some(Self { q, options, answer })
    }

    /// Deterministic stand-in used when the model gives nothing usable.
    /// `number` is 1-based.
    pub fn placeholder(number: usize, topic: &str) -> Self {
        Self {
            q: format!("Placeholder question {} about {}?", number, topic),
            options: PLACEHOLDER_OPTIONS.iter().map(|o| o.to_string()).collect(),
            answer: PLACEHOLDER_ANSWER.to_string(),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
