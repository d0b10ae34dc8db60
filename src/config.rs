use crate::chat::gemini::{GeminiConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value {value:?} for {field}: {reason}")]
pub struct ConfigError {
    pub field: String,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    fn new(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "fractional-estate")]
#[command(about = "Property catalog, chat assistant and share ledger API")]
pub struct Config {
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// JSON array of property records.
    #[arg(long, env = "CATALOG_PATH", default_value = "public/data/properties.json")]
    pub catalog_path: PathBuf,

    #[arg(long, default_value = "8")]
    pub workers: usize,

    #[arg(long, env = "CHAT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub chat_endpoint: String,

    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub chat_model: String,

    /// Chat is disabled when no key is set.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub chat_api_key: Option<String>,

    #[arg(long, default_value = "30")]
    pub chat_timeout_secs: u64,

    #[arg(long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::new("workers", self.workers, "must be at least 1"));
        }

        if self.catalog_path.as_os_str().is_empty() {
            return Err(ConfigError::new("catalog_path", "", "path cannot be empty"));
        }

        match Url::parse(&self.chat_endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::new(
                    "chat_endpoint",
                    &self.chat_endpoint,
                    format!("unsupported URL scheme: {}", url.scheme()),
                ))
            }
            Err(e) => {
                return Err(ConfigError::new(
                    "chat_endpoint",
                    &self.chat_endpoint,
                    format!("invalid URL: {e}"),
                ))
            }
        }

        if self.chat_model.trim().is_empty() {
            return Err(ConfigError::new("chat_model", "", "model name cannot be empty"));
        }

        if self.chat_timeout_secs == 0 {
            return Err(ConfigError::new(
                "chat_timeout_secs",
                self.chat_timeout_secs,
                "must be at least 1",
            ));
        }

        Ok(())
    }

    /// Chat provider settings, or `None` when no API key is configured.
    pub fn gemini(&self) -> Option<GeminiConfig> {
        let api_key = self
            .chat_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())?;

        Some(GeminiConfig {
            endpoint: self.chat_endpoint.clone(),
            model: self.chat_model.clone(),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(self.chat_timeout_secs),
        })
    }
}
