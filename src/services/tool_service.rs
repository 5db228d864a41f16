use std::sync::Arc;

use crate::{
    constants::prompts::MATH_PROMPT,
    errors::AppResult,
    models::dto::response::MathResponseDto,
    services::gateway::{GenerationGateway, DEFAULT_TEMPERATURE},
};

/// Shared plumbing for the prompt-in, text-out tools.
pub struct ToolService {
    gateway: Arc<dyn GenerationGateway>,
}

impl ToolService {
    pub fn new(gateway: Arc<dyn GenerationGateway>) -> Self {
        Self { gateway }
    }

    pub async fn generate(&self, prompt: &str) -> AppResult<String> {
        let text = self
            .gateway
            .generate_text(prompt, DEFAULT_TEMPERATURE)
            .await?;
        Ok(text.trim().to_string())
    }

    pub async fn describe_image(&self, image: &[u8]) -> AppResult<String> {
        let text = self.gateway.image_to_text(image).await?;
        Ok(text.trim().to_string())
    }

    pub async fn solve_math(&self, problem: &str) -> AppResult<MathResponseDto> {
        let steps = self.generate(&format!("{}{}", MATH_PROMPT, problem)).await?;
        let answer = final_answer(&steps).unwrap_or_else(|| steps.clone());
        Ok(MathResponseDto { steps, answer })
    }
}

/// Text after the first `:` of the last `ANSWER:` line, if it is non-empty.
fn final_answer(steps: &str) -> Option<String> {
    steps
        .lines()
        .rev()
        .find(|line| line.trim().to_uppercase().starts_with("ANSWER:"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, answer)| answer.trim().to_string())
        .filter(|answer| !answer.is_empty())
}
