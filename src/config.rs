use std::env;
use secrecy::SecretString;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub frontend_url: String,
    pub cors_allowed_origins: Vec<String>,
    /// Shared secret for bearer tokens. `None` means every token is treated as absent.
    pub jwt_secret: Option<SecretString>,
    pub dev_auth_bypass: bool,
    /// Upstream credential. `None` makes every generation call return an empty string.
    pub gemini_api_key: Option<SecretString>,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let cors_allowed_origins = match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(list) => parse_origins(&list),
            Err(_) => {
                let mut origins: Vec<String> = DEV_ORIGINS.iter().map(|o| o.to_string()).collect();
                if !origins.contains(&frontend_url) {
                    origins.push(frontend_url.clone());
                }
                origins
            }
        };

        Self {
            web_server_host: env::var("WEB_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            frontend_url,
            cors_allowed_origins,
            jwt_secret: non_empty_var("SUPABASE_JWT_SECRET").map(SecretString::from),
            dev_auth_bypass: dev_bypass_enabled(
                env::var("DEV_AUTH_BYPASS").ok().as_deref(),
                env::var("APP_ENV")
                    .or_else(|_| env::var("FLASK_ENV"))
                    .ok()
                    .as_deref(),
            ),
            gemini_api_key: non_empty_var("GEMINI_API_KEY").map(SecretString::from),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
        }
    }

    /// Logs the degraded modes this configuration will run in.
    pub fn log_warnings(&self) {
        if self.jwt_secret.is_none() {
            log::warn!("SUPABASE_JWT_SECRET not set; bearer tokens will be ignored");
        }
        if self.dev_auth_bypass {
            log::warn!("development auth bypass is ACTIVE; every request is allowed");
        }
        if self.gemini_api_key.is_none() {
            log::warn!("GEMINI_API_KEY not set; generation calls will return empty text");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 5000,
            frontend_url: "http://localhost:5173".to_string(),
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            jwt_secret: Some(SecretString::from("test_jwt_secret_key".to_string())),
            dev_auth_bypass: false,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn dev_bypass_enabled(flag: Option<&str>, app_env: Option<&str>) -> bool {
    flag == Some("1") || app_env == Some("development")
}
