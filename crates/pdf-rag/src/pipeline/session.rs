//! Long-lived pipeline context shared by the CLI and the HTTP server

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::DocumentLoader;
use crate::providers::{self, EmbedderIdentity, EmbeddingProvider, LlmProvider};
use crate::retrieval::{IndexLocation, VectorIndex};
use crate::types::{AnswerRecord, IndexManifest, IndexSummary};

use super::answerer::Answerer;
use super::indexer::index_documents;

/// Snapshot of the session for status endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub documents_dir: String,
    /// PDF files currently in the documents directory
    pub documents: Vec<String>,
    pub index_location: String,
    pub index_loaded: bool,
    pub index_entries: usize,
    pub manifest: Option<IndexManifest>,
    pub rebuilding: bool,
    pub embedder: EmbedderIdentity,
    pub llm_model: String,
    pub llm_available: bool,
}

/// Configuration, providers and the currently committed index
pub struct RagSession {
    config: RagConfig,
    location: IndexLocation,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    /// Readers clone the Arc and keep using it across a rebuild
    index: RwLock<Option<Arc<VectorIndex>>>,
    /// Held for the whole of a rebuild
    rebuild_lock: Mutex<()>,
}

impl RagSession {
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let location = IndexLocation::new(&config.paths.persist_dir, &config.paths.collection);
        Self {
            config,
            location,
            embedder,
            llm,
            index: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Build providers from configuration and load any persisted index
    pub async fn from_config(config: RagConfig) -> Result<Self> {
        let embedder = providers::create_embedder(&config.embeddings).await?;
        let llm = providers::create_llm(&config.llm)?;
        let session = Self::new(config, embedder, llm);
        session.reload()?;
        Ok(session)
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn location(&self) -> &IndexLocation {
        &self.location
    }

    /// Load the persisted index; returns false when there is none usable
    ///
    /// An index built with another embedder is left on disk and not loaded, so
    /// the next `reindex` replaces it.
    pub fn reload(&self) -> Result<bool> {
        match VectorIndex::open(&self.location, &self.embedder.identity()) {
            Ok(index) => {
                *self.index.write() = Some(Arc::new(index));
                Ok(true)
            }
            Err(e) if e.is_no_index() => {
                tracing::info!("No index loaded: {}", e);
                *self.index.write() = None;
                Ok(false)
            }
            Err(e @ Error::EmbedderMismatch { .. }) => {
                tracing::warn!("Persisted index ignored: {}", e);
                *self.index.write() = None;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// The last committed index, if any
    pub fn current_index(&self) -> Option<Arc<VectorIndex>> {
        self.index.read().clone()
    }

    /// Rebuild from the documents directory and swap the result in
    ///
    /// One rebuild runs at a time. Questions asked meanwhile are answered from
    /// the previous index.
    pub async fn reindex(&self) -> Result<IndexSummary> {
        let _guard = self.rebuild_lock.lock().await;

        let outcome = index_documents(&self.config, self.embedder.as_ref()).await?;
        *self.index.write() = Some(Arc::new(outcome.index));

        Ok(outcome.summary)
    }

    /// Answer a question from the current index
    pub async fn ask(&self, question: &str) -> Result<AnswerRecord> {
        let index = self.current_index();
        Answerer::new(
            self.embedder.as_ref(),
            self.llm.as_ref(),
            &self.config.retrieval,
        )
        .with_index_label(self.location.to_string())
        .ask(question, index.as_deref())
        .await
    }

    /// PDF file names in the documents directory
    pub fn documents(&self) -> Vec<String> {
        DocumentLoader::list_documents(&self.config.paths.documents_dir)
    }

    /// True when the generation service answers its probe
    pub async fn llm_available(&self) -> bool {
        self.llm.health_check().await.unwrap_or(false)
    }

    pub fn is_rebuilding(&self) -> bool {
        self.rebuild_lock.try_lock().is_err()
    }

    pub async fn status(&self) -> SessionStatus {
        let index = self.current_index();
        SessionStatus {
            documents_dir: self.config.paths.documents_dir.display().to_string(),
            documents: self.documents(),
            index_location: self.location.to_string(),
            index_loaded: index.is_some(),
            index_entries: index.as_ref().map(|i| i.len()).unwrap_or(0),
            manifest: index.as_ref().map(|i| i.manifest().clone()),
            rebuilding: self.is_rebuilding(),
            embedder: self.embedder.identity(),
            llm_model: self.llm.model().to_string(),
            llm_available: self.llm_available().await,
        }
    }
}
