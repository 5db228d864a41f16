use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::domain::{QuizQuestion, UsageEntry};

/// The body shape every endpoint answers with.
///
/// `ok` decides which side is populated: `result` on success, `error` on failure.
/// Both keys are always serialized so clients can rely on the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    pub result: Option<Value>,
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl Envelope {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn fail(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(ErrorBody {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResponseDto {
    pub questions: Vec<QuizQuestion>,
    pub topic: String,
    pub difficulty: String,
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MathResponseDto {
    pub steps: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct UsageResponseDto {
    pub usage: Vec<UsageEntry>,
}
