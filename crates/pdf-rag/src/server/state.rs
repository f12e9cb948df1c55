//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::pipeline::RagSession;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    session: Arc<RagSession>,
}

impl AppState {
    /// Create state from configuration, loading any persisted index
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state...");
        let session = RagSession::from_config(config).await?;
        Ok(Self::from_session(Arc::new(session)))
    }

    pub fn from_session(session: Arc<RagSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &RagSession {
        &self.session
    }

    pub fn config(&self) -> &RagConfig {
        self.session.config()
    }

    /// Ready once an index is loaded
    pub fn is_ready(&self) -> bool {
        self.session.current_index().is_some()
    }

    /// Fail fast with an actionable message when the model server is down
    pub async fn require_llm(&self) -> Result<()> {
        if self.session.llm_available().await {
            return Ok(());
        }
        let llm = &self.config().llm;
        tracing::warn!("Ollama not reachable at {}", llm.base_url);
        Err(Error::GenerationUnavailable(format!(
            "Ollama is not reachable at {}. Start it with `ollama serve` and make sure model '{}' is pulled.",
            llm.base_url, llm.model
        )))
    }
}
