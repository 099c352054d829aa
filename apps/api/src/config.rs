use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::models::ModelId;

const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Chat-completions endpoint of the LLM provider.
    pub llm_api_url: String,
    pub default_model: ModelId,
    /// `None` leaves the transport default in place (no timeout).
    pub llm_timeout: Option<Duration>,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            llm_api_url: DEFAULT_GROQ_API_URL.to_string(),
            default_model: ModelId::default(),
            llm_timeout: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let default_model = match optional_env("DEFAULT_MODEL") {
            Some(id) => ModelId::from_id(&id)
                .with_context(|| format!("DEFAULT_MODEL '{id}' is not a known model id"))?,
            None => defaults.default_model,
        };

        let llm_timeout = optional_env("LLM_TIMEOUT_SECS")
            .map(|v| {
                v.parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?
            .map(Duration::from_secs);

        let max_upload_bytes = match optional_env("MAX_UPLOAD_MB") {
            Some(v) => megabytes_to_bytes(&v)?,
            None => defaults.max_upload_bytes,
        };

        Ok(Config {
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            llm_api_url: optional_env("GROQ_API_URL").unwrap_or(defaults.llm_api_url),
            default_model,
            llm_timeout,
            max_upload_bytes,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn megabytes_to_bytes(value: &str) -> Result<usize> {
    let mb = value
        .trim()
        .parse::<usize>()
        .context("MAX_UPLOAD_MB must be a whole number of megabytes")?;
    mb.checked_mul(1024 * 1024)
        .with_context(|| format!("MAX_UPLOAD_MB {mb} is too large"))
}
