//! Embedding provider trait for generating text embeddings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Which model produced a set of vectors
///
/// Stored with every persisted index; vectors from different identities are
/// never compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmbedderIdentity {
    /// Backend name, e.g. `ollama` or `onnx`
    pub provider: String,
    /// Model identifier
    pub model: String,
    /// Vector length
    pub dimensions: usize,
}

impl EmbedderIdentity {
    pub fn new(provider: impl Into<String>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            dimensions,
        }
    }
}

impl fmt::Display for EmbedderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({} dims)", self.provider, self.model, self.dimensions)
    }
}

/// Trait for generating text embeddings
///
/// Implementations:
/// - `OllamaEmbedder`: local Ollama server (`/api/embed`)
/// - `OnnxEmbedder`: in-process ONNX Runtime session (feature `onnx`)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order
    ///
    /// Must return exactly what repeated `embed` calls would.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Model identity, persisted alongside the index
    fn identity(&self) -> EmbedderIdentity;

    /// Embedding dimensions (384 for MiniLM)
    fn dimensions(&self) -> usize {
        self.identity().dimensions
    }

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
