use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    constants::quiz_prompt::{quiz_prompt, QUIZ_TEMPERATURE},
    models::{domain::QuizQuestion, dto::response::QuizResponseDto},
    services::{
        gateway::GenerationGateway,
        json_extract::{extract_structured, Extracted},
    },
};

/// Top-level schema the model is asked to produce.
#[derive(Debug, Deserialize)]
struct QuizPayload {
    questions: Vec<Value>,
}

/// Outcome of decoding the model's quiz text.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelQuiz {
    /// The text held an object with a `questions` array. Unusable entries are dropped,
    /// so the list may be empty.
    Decoded(Vec<QuizQuestion>),
    /// No `{"questions": [...]}` object could be recovered.
    Undecodable,
}

pub fn decode_quiz(raw: &str) -> ModelQuiz {
    let value = match extract_structured(raw) {
        Extracted::Structured(value @ Value::Object(_)) => value,
        _ => return ModelQuiz::Undecodable,
    };

    match QuizPayload::deserialize(&value) {
        Ok(payload) => ModelQuiz::Decoded(
            payload
                .questions
                .iter()
                .filter_map(QuizQuestion::from_entry)
                .collect(),
        ),
        Err(_) => ModelQuiz::Undecodable,
    }
}

pub fn placeholder_questions(count: usize, topic: &str) -> Vec<QuizQuestion> {
    (1..=count)
        .map(|number| QuizQuestion::placeholder(number, topic))
        .collect()
}

pub struct QuizService {
    gateway: Arc<dyn GenerationGateway>,
}

impl QuizService {
    pub fn new(gateway: Arc<dyn GenerationGateway>) -> Self {
        Self { gateway }
    }

    /// Builds a quiz that always carries questions. When the model output is
    /// unusable (or the model cannot be reached) `count` placeholders are returned.
    /// `raw` holds the model text only when it could not be decoded at all.
    pub async fn assemble(&self, topic: &str, count: usize, difficulty: &str) -> QuizResponseDto {
        let prompt = quiz_prompt(topic, count, difficulty);

        let (questions, raw) = match self.gateway.generate_text(&prompt, QUIZ_TEMPERATURE).await {
            Ok(text) => {
                let text = text.trim().to_string();
                match decode_quiz(&text) {
                    ModelQuiz::Decoded(questions) => (questions, None),
                    ModelQuiz::Undecodable => {
                        log::info!("Quiz output for '{}' was not valid quiz JSON", topic);
                        (Vec::new(), Some(text))
                    }
                }
            }
            Err(e) => {
                log::warn!("Quiz generation for '{}' failed, using placeholders: {}", topic, e);
                (Vec::new(), None)
            }
        };

        let questions = if questions.is_empty() {
            placeholder_questions(count, topic)
        } else {
            questions
        };

        QuizResponseDto {
            questions,
            topic: topic.to_string(),
            difficulty: difficulty.to_string(),
            raw,
        }
    }
}
