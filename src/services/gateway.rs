use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const IMAGE_BASE64_LIMIT: usize = 40_000;
const IMAGE_PROMPT: &str = "Describe the following image provided as base64. Include objects, colors, any text (transcribe exactly), and overall scene context. Base64: ";

/// Failure reasons of the generation backend. The display text is the reason code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("rate_limit")]
    RateLimit,

    #[error("model_http_error {status}: {body}")]
    ModelHttp { status: u16, body: String },

    #[error("empty_response")]
    EmptyResponse,

    #[error("no_text_part")]
    NoTextPart,

    #[error("malformed_response: {0}")]
    MalformedResponse(String),

    #[error("transport_error: {0}")]
    Transport(String),
}

/// The single egress point to the text generation model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate_text(&self, prompt: &str, temperature: f32) -> Result<String, GatewayError>;

    async fn image_to_text(&self, image: &[u8]) -> Result<String, GatewayError>;
}

/// Prompt sent for an image description request.
pub fn image_prompt(image: &[u8]) -> String {
    let mut encoded = STANDARD.encode(image);
    encoded.truncate(IMAGE_BASE64_LIMIT);
    format!("{}{}", IMAGE_PROMPT, encoded)
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Maps an upstream status and body to the generated text or a failure reason.
fn interpret_response(status: u16, body: &str) -> Result<String, GatewayError> {
    if status == 429 {
        return Err(GatewayError::RateLimit);
    }
    if status >= 400 {
        return Err(GatewayError::ModelHttp {
            status,
            body: body.to_string(),
        });
    }

    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GatewayError::EmptyResponse)?;

    candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .find(|text| !text.is_empty())
        .map(|text| text.trim().to_string())
        .ok_or(GatewayError::NoTextPart)
}

/// Google Gemini `generateContent` backend.
pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    endpoint: String,
}

impl GeminiGateway {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.gemini_base_url.trim_end_matches('/'),
                config.gemini_model
            ),
        })
    }
}

#[async_trait]
impl GenerationGateway for GeminiGateway {
    async fn generate_text(&self, prompt: &str, temperature: f32) -> Result<String, GatewayError> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Ok(String::new());
        };

        let payload = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key.expose_secret())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        interpret_response(status, &body)
    }

    async fn image_to_text(&self, image: &[u8]) -> Result<String, GatewayError> {
        self.generate_text(&image_prompt(image), DEFAULT_TEMPERATURE)
            .await
    }
}
