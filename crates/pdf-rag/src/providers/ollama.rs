//! Ollama-based providers for embeddings and LLM
//!
//! Wraps the shared OllamaClient to implement the provider traits.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};
use crate::generation::OllamaClient;

use super::embedding::{EmbedderIdentity, EmbeddingProvider};
use super::llm::LlmProvider;

/// Ollama embedding provider (`all-minilm` by default)
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = OllamaClient::new(&config.base_url, config.timeout_secs)?;
        Ok(Self::from_client(Arc::new(client), config))
    }

    /// Create from existing OllamaClient
    pub fn from_client(client: Arc<OllamaClient>, config: &EmbeddingConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            dimensions: config.dimensions,
            batch_size: config.batch_size.max(1),
        }
    }

    fn check_dimensions(&self, vectors: &[Vec<f32>]) -> Result<()> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimensions) {
            return Err(Error::embedding(format!(
                "model '{}' returned {} dimensions, configured for {}",
                self.model,
                bad.len(),
                self.dimensions
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::embedding("empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let vectors = self.client.embed(&self.model, batch).await?;
            self.check_dimensions(&vectors)?;
            embeddings.extend(vectors);
        }
        Ok(embeddings)
    }

    fn identity(&self) -> EmbedderIdentity {
        EmbedderIdentity::new("ollama", &self.model, self.dimensions)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.client.health_check(Duration::from_secs(3)).await)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
    model: String,
    temperature: f32,
    probe_timeout: Duration,
}

impl OllamaLlm {
    /// Create a new Ollama LLM provider
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = OllamaClient::new(&config.base_url, config.timeout_secs)?;
        Ok(Self {
            client: Arc::new(client),
            model: config.model.clone(),
            temperature: config.temperature,
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client
            .generate(&self.model, prompt, self.temperature)
            .await
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.client.health_check(self.probe_timeout).await)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_identity_from_config() {
        let config = EmbeddingConfig::default();
        let embedder = OllamaEmbedder::new(&config).unwrap();
        assert_eq!(
            embedder.identity(),
            EmbedderIdentity::new("ollama", "all-minilm", 384)
        );
        assert_eq!(embedder.dimensions(), 384);
    }

    #[test]
    fn test_dimension_mismatch_is_embedding_error() {
        let config = EmbeddingConfig {
            dimensions: 3,
            ..EmbeddingConfig::default()
        };
        let embedder = OllamaEmbedder::new(&config).unwrap();

        assert!(embedder.check_dimensions(&[vec![0.0; 3]]).is_ok());
        let err = embedder.check_dimensions(&[vec![0.0; 3], vec![0.0; 4]]).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn test_llm_reports_model() {
        let llm = OllamaLlm::new(&LlmConfig::default()).unwrap();
        assert_eq!(llm.model(), "llama3.2:3b");
        assert_eq!(llm.name(), "ollama");
    }
}
