use crate::chat::prompt::{FALLBACK_REPLY, MAX_OUTPUT_TOKENS, SYSTEM_PROMPT, TEMPERATURE};
use crate::chat::{ChatError, ChatProvider, ChatTurn};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL up to and including the API version.
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Calls the `generateContent` endpoint with a fixed system prompt.
pub struct GeminiClient {
    client: Client,
    cfg: GeminiConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(cfg: GeminiConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(ChatError::Transport)?;

        Ok(Self { client, cfg })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.cfg.endpoint.trim_end_matches('/'),
            self.cfg.model
        )
    }
}

/// History first, then the new message, in the provider's role vocabulary.
pub fn build_request(message: &str, history: &[ChatTurn]) -> Value {
    let mut contents: Vec<Value> = history
        .iter()
        .filter(|turn| !turn.content.trim().is_empty())
        .map(|turn| {
            json!({
                "role": turn.provider_role(),
                "parts": [{ "text": turn.content }]
            })
        })
        .collect();

    contents.push(json!({
        "role": "user",
        "parts": [{ "text": message }]
    }));

    json!({
        "systemInstruction": {
            "parts": [{ "text": SYSTEM_PROMPT }]
        },
        "contents": contents,
        "generationConfig": {
            "temperature": TEMPERATURE,
            "maxOutputTokens": MAX_OUTPUT_TOKENS
        }
    })
}

impl ChatProvider for GeminiClient {
    fn reply(&self, message: &str, history: &[ChatTurn]) -> Result<String, ChatError> {
        let body = build_request(message, history);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.cfg.api_key)
            .json(&body)
            .send()
            .map_err(ChatError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ChatError::Provider {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateResponse = response.json().map_err(ChatError::Transport)?;

        let reply = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());

        Ok(reply)
    }
}
