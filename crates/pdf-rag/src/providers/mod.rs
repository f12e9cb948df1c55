//! Provider abstractions for embeddings and LLM
//!
//! Trait-based seams so the pipeline can run against Ollama, a local ONNX model,
//! or test doubles.

pub mod embedding;
pub mod llm;
pub mod ollama;

use std::sync::Arc;

use crate::config::{EmbeddingBackend, EmbeddingConfig, LlmConfig};
use crate::error::Result;

pub use embedding::{EmbedderIdentity, EmbeddingProvider};
pub use llm::LlmProvider;
pub use ollama::{OllamaEmbedder, OllamaLlm};

/// Instantiate the configured embedding backend
pub async fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider {
        EmbeddingBackend::Ollama => {
            tracing::info!("Using Ollama embeddings ({})", config.model);
            Ok(Arc::new(OllamaEmbedder::new(config)?))
        }
        #[cfg(feature = "onnx")]
        EmbeddingBackend::Onnx => Ok(Arc::new(
            crate::embeddings::OnnxEmbedder::new(config).await?,
        )),
        #[cfg(not(feature = "onnx"))]
        EmbeddingBackend::Onnx => Err(crate::error::Error::Config(
            "embeddings.provider = \"onnx\" requires building with the `onnx` feature".into(),
        )),
    }
}

/// Instantiate the generation backend
pub fn create_llm(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    tracing::info!("Using Ollama generation ({})", config.model);
    Ok(Arc::new(OllamaLlm::new(config)?))
}
