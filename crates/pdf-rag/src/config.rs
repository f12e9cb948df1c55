//! Configuration for the RAG pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main RAG configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Filesystem locations
    pub paths: PathsConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Generation (Ollama) configuration
    pub llm: LlmConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Server configuration
    pub server: ServerConfig,
}

impl RagConfig {
    /// Parse a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(raw: &str) -> Result<Self> {
        let mut config: RagConfig =
            toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.embeddings.apply_backend_default_model();
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let c = &self.chunking;
        if c.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be > 0".into()));
        }
        if c.chunk_overlap >= c.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                c.chunk_overlap, c.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be > 0".into()));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::Config("embeddings.dimensions must be > 0".into()));
        }
        if self.embeddings.batch_size == 0 {
            return Err(Error::Config("embeddings.batch_size must be > 0".into()));
        }
        if self.embeddings.model.trim().is_empty() {
            return Err(Error::Config("embeddings.model must not be empty".into()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(Error::Config("llm.model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::Config(format!(
                "llm.temperature ({}) must be within 0.0..=2.0",
                self.llm.temperature
            )));
        }
        if self.paths.collection.trim().is_empty() {
            return Err(Error::Config("paths.collection must not be empty".into()));
        }
        Ok(())
    }
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned (non-recursively) for PDF files
    pub documents_dir: PathBuf,
    /// Directory holding the persisted index
    pub persist_dir: PathBuf,
    /// Collection name; the index file is `<persist_dir>/<collection>.sqlite`
    pub collection: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("documents"),
            persist_dir: PathBuf::from("index"),
            collection: "my-documents".to_string(),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Characters shared between neighbouring chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Which embedding backend to instantiate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Ollama `/api/embed`
    #[default]
    Ollama,
    /// Local ONNX Runtime session (feature `onnx`)
    ///
    /// Models are fetched from the Hugging Face `sentence-transformers`
    /// organisation, so `model` is a repository name there.
    Onnx,
}

impl EmbeddingBackend {
    /// MiniLM under the name each backend knows it by
    pub fn default_model(&self) -> &'static str {
        match self {
            EmbeddingBackend::Ollama => "all-minilm",
            EmbeddingBackend::Onnx => "all-MiniLM-L6-v2",
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Backend provider
    pub provider: EmbeddingBackend,
    /// Model identifier (Ollama tag, or sentence-transformers name for ONNX)
    pub model: String,
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
    /// Texts per embedding request
    pub batch_size: usize,
    /// Ollama base URL
    pub base_url: String,
    /// Device hint for local inference
    pub device: String,
    /// Cache directory for downloaded models
    pub cache_dir: PathBuf,
    /// Maximum sequence length (ONNX tokenizer truncation)
    pub max_length: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingBackend::Ollama,
            model: EmbeddingBackend::Ollama.default_model().to_string(),
            dimensions: 384,
            batch_size: 32,
            base_url: "http://localhost:11434".to_string(),
            device: "cpu".to_string(),
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pdf-rag")
                .join("models"),
            max_length: 256,
            timeout_secs: 60,
        }
    }
}

impl EmbeddingConfig {
    /// Swap the Ollama default tag for the ONNX repository name when only the
    /// provider was changed
    fn apply_backend_default_model(&mut self) {
        if self.provider == EmbeddingBackend::Onnx
            && self.model == EmbeddingBackend::Ollama.default_model()
        {
            self.model = EmbeddingBackend::Onnx.default_model().to_string();
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Sampling temperature; low values keep answers close to the sources
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Timeout for the liveness probe in seconds
    pub probe_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            temperature: 0.1,
            timeout_secs: 120,
            probe_timeout_secs: 3,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks retrieved per question
    pub top_k: usize,
    /// Characters of chunk text kept in each citation excerpt
    pub excerpt_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            excerpt_chars: 300,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RagConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.paths.collection, "my-documents");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RagConfig::from_toml(
            r#"
            [chunking]
            chunk_size = 500
            chunk_overlap = 50

            [llm]
            model = "phi3"
            "#,
        )
        .unwrap();

        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert_eq!(config.llm.model, "phi3");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.embeddings.provider, EmbeddingBackend::Ollama);
        assert_eq!(config.retrieval.top_k, 4);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let err = RagConfig::from_toml(
            r#"
            [chunking]
            chunk_size = 100
            chunk_overlap = 100
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_zero_top_k_and_bad_temperature() {
        let mut config = RagConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = RagConfig::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_parses_lowercase() {
        let config = RagConfig::from_toml(
            r#"
            [embeddings]
            provider = "onnx"
            model = "all-MiniLM-L6-v2"
            "#,
        )
        .unwrap();
        assert_eq!(config.embeddings.provider, EmbeddingBackend::Onnx);
    }

    #[test]
    fn test_onnx_provider_gets_its_own_default_model() {
        let config = RagConfig::from_toml(
            r#"
            [embeddings]
            provider = "onnx"
            "#,
        )
        .unwrap();
        assert_eq!(config.embeddings.model, "all-MiniLM-L6-v2");

        let config = RagConfig::from_toml("").unwrap();
        assert_eq!(config.embeddings.model, "all-minilm");
    }
}
