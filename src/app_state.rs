use std::sync::Arc;

use crate::{
    auth::{AccessGate, TokenVerifier},
    config::Config,
    errors::AppResult,
    services::{
        gateway::{GeminiGateway, GenerationGateway},
        quiz_service::QuizService,
        tool_service::ToolService,
        usage_service::UsageLog,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub tool_service: Arc<ToolService>,
    pub quiz_service: Arc<QuizService>,
    pub usage_log: Arc<UsageLog>,
    pub token_verifier: Arc<TokenVerifier>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let gateway = Arc::new(GeminiGateway::new(&config)?);
        Ok(Self::with_gateway(config, gateway))
    }

    /// Builds the state around any generation backend.
    pub fn with_gateway(config: Config, gateway: Arc<dyn GenerationGateway>) -> Self {
        let token_verifier = Arc::new(TokenVerifier::new(config.jwt_secret.as_ref()));

        Self {
            tool_service: Arc::new(ToolService::new(Arc::clone(&gateway))),
            quiz_service: Arc::new(QuizService::new(gateway)),
            usage_log: Arc::new(UsageLog::new()),
            token_verifier,
            config: Arc::new(config),
        }
    }

    pub fn access_gate(&self) -> AccessGate {
        AccessGate::new(Arc::clone(&self.token_verifier), self.config.dev_auth_bypass)
    }
}
