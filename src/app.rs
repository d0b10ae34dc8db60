use crate::catalog::{CatalogService, JsonFileSource};
use crate::chat::{ChatError, ChatProvider, GeminiClient};
use crate::config::Config;
use crate::ledger::{InMemoryLedger, ShareLedger};

/// Everything a request handler can reach. Built once in `main` and shared by
/// every worker thread.
pub struct AppState {
    pub catalog: CatalogService,
    pub ledger: Box<dyn ShareLedger>,
    /// `None` when no provider is configured.
    pub chat: Option<Box<dyn ChatProvider>>,
}

impl AppState {
    pub fn new(
        catalog: CatalogService,
        ledger: impl ShareLedger + 'static,
        chat: Option<Box<dyn ChatProvider>>,
    ) -> Self {
        Self {
            catalog,
            ledger: Box::new(ledger),
            chat,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ChatError> {
        let catalog = CatalogService::new(JsonFileSource::new(&cfg.catalog_path));

        let chat: Option<Box<dyn ChatProvider>> = match cfg.gemini() {
            Some(gemini) => Some(Box::new(GeminiClient::new(gemini)?)),
            None => {
                tracing::warn!("no chat API key configured, /chat is disabled");
                None
            }
        };

        Ok(Self::new(catalog, InMemoryLedger::new(), chat))
    }
}
