// errors.rs
use astra::Response;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::chat::ChatError;
use crate::ledger::LedgerError;

/// Every way a request can fail. Each variant maps to one HTTP status; the
/// catalog, chat and ledger errors fold into it through the `From` impls below.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service Unavailable: {0}")]
    Unavailable(String),

    /// Detail is logged, never sent to the caller.
    #[error("Internal Error: {0}")]
    Internal(String),
}

/// What a route returns before `respond` renders the error case.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound(_) => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::MethodNotAllowed => 405,
            ServerError::Conflict(_) => 409,
            ServerError::Unavailable(_) => 503,
            ServerError::Internal(_) => 500,
        }
    }

    /// Message safe to hand back to a client.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::NotFound(msg)
            | ServerError::BadRequest(msg)
            | ServerError::Conflict(msg)
            | ServerError::Unavailable(msg) => msg.clone(),
            ServerError::MethodNotAllowed => "Method not allowed".to_string(),
            ServerError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<CatalogError> for ServerError {
    fn from(err: CatalogError) -> Self {
        ServerError::Internal(format!("catalog: {err}"))
    }
}

impl From<ChatError> for ServerError {
    fn from(err: ChatError) -> Self {
        ServerError::Internal(format!("chat: {err}"))
    }
}

impl From<LedgerError> for ServerError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotTokenized(_) => ServerError::NotFound(err.to_string()),
            LedgerError::InvalidQuantity { .. } => ServerError::BadRequest(err.to_string()),
            LedgerError::Inactive(_) | LedgerError::InsufficientShares { .. } => {
                ServerError::Conflict(err.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Internal(format!("serialization: {err}"))
    }
}
