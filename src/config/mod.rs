use secrecy::Secret;
use serde::Deserialize;
use std::env;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// API credential, loaded once at startup and read-only thereafter.
    pub api_key: Secret<String>,
}

/// Which generation backend the app talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Mock,
}

#[derive(Debug, Clone)]
pub struct GenaiConfig {
    /// Model used for generateContent calls (e.g. gemini-2.0-flash).
    pub text_model: String,
    pub provider: ProviderKind,
    /// Whether the mock provider answers or fails; used for failure injection
    /// in tests. Ignored by the Gemini provider.
    pub mock_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub google: GoogleConfig,
    pub genai: GenaiConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let server: ServerConfig = config::Config::builder()
            .add_source(config::File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let provider = match get_env("GENAI_PROVIDER", Some("gemini"), is_prod)?.as_str() {
            "gemini" => ProviderKind::Gemini,
            "mock" => ProviderKind::Mock,
            other => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "unknown GENAI_PROVIDER '{}' (expected 'gemini' or 'mock')",
                    other
                )))
            }
        };

        Ok(AppConfig {
            server,
            google: GoogleConfig {
                api_key: Secret::new(get_env("GOOGLE_API_KEY", None, is_prod)?),
            },
            genai: GenaiConfig {
                text_model: get_env("GENAI_TEXT_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                provider,
                mock_enabled: get_env("GENAI_MOCK_ENABLED", Some("true"), is_prod)?
                    .parse()
                    .unwrap_or(true),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
