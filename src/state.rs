use crate::config::AppConfig;
use crate::db::Database;
use crate::errors::ServerError;
use crate::search::{OpenAiChatModel, SearchService};

/// Everything request handlers need, shared by all server workers.
pub struct AppState {
    pub search: SearchService,
}

impl AppState {
    pub fn new(search: SearchService) -> Self {
        Self { search }
    }

    /// Production wiring: the hosted chat model over the SQLite listing store.
    pub fn from_config(cfg: &AppConfig, db: Database) -> Result<Self, ServerError> {
        let model = OpenAiChatModel::new(cfg.llm.clone())
            .map_err(|e| ServerError::Config(e.to_string()))?;
        Ok(Self::new(SearchService::new(Box::new(model), Box::new(db))))
    }
}
