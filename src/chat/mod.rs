pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiConfig};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request to chat provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat provider returned {status}: {body}")]
    Provider { status: u16, body: String },
}

/// One earlier message in the conversation, as the browser widget keeps it.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    /// The provider calls the assistant side "model".
    pub fn provider_role(&self) -> &'static str {
        match self.role.as_str() {
            "assistant" | "model" => "model",
            _ => "user",
        }
    }
}

/// Anything that can turn a user message into an assistant reply.
pub trait ChatProvider: Send + Sync {
    fn reply(&self, message: &str, history: &[ChatTurn]) -> Result<String, ChatError>;
}
