//! Error types for the RAG pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::providers::EmbedderIdentity;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ingestion produced no text at all
    #[error("No documents found in '{0}': add PDF files to the documents directory")]
    NoDocumentsFound(String),

    /// A single document could not be read (contained by the loader)
    #[error("Failed to load document '{filename}': {message}")]
    DocumentLoad { filename: String, message: String },

    /// Index build was handed zero chunks
    #[error("Nothing to index: the chunk sequence is empty")]
    NothingToIndex,

    /// Embedding service could not be reached
    #[error("Embedding service unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// Embedding service answered but the result is unusable
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Generation service could not be reached
    #[error("Generation service unavailable: {0}")]
    GenerationUnavailable(String),

    /// Generation service answered but the result is unusable
    #[error("Generation failed: {0}")]
    Generation(String),

    /// No persisted index at the given location
    #[error("Index not found at '{0}': run indexing first")]
    IndexNotFound(String),

    /// A persisted index exists but holds no entries
    #[error("Index at '{0}' is empty: run indexing again")]
    EmptyIndex(String),

    /// The persisted index was built with a different embedder
    #[error("Index was built with embedder {found} but the configured embedder is {expected}: rebuild the index")]
    EmbedderMismatch {
        expected: EmbedderIdentity,
        found: EmbedderIdentity,
    },

    /// Malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a document load error
    pub fn document_load(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentLoad {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True when the caller has to (re)build the index before asking
    pub fn is_no_index(&self) -> bool {
        matches!(self, Self::IndexNotFound(_) | Self::EmptyIndex(_))
    }

    /// True when an external service could not be reached
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingUnavailable(_) | Self::GenerationUnavailable(_)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::Config(_) => (StatusCode::BAD_REQUEST, "config_error"),
            Error::NoDocumentsFound(_) => (StatusCode::BAD_REQUEST, "no_documents"),
            Error::DocumentLoad { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "load_error"),
            Error::NothingToIndex => (StatusCode::BAD_REQUEST, "nothing_to_index"),
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Error::EmbeddingUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "embedding_unavailable")
            }
            Error::GenerationUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_unavailable")
            }
            Error::Embedding(_) => (StatusCode::BAD_GATEWAY, "embedding_error"),
            Error::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_error"),
            Error::IndexNotFound(_) => (StatusCode::CONFLICT, "index_not_found"),
            Error::EmptyIndex(_) => (StatusCode::CONFLICT, "empty_index"),
            Error::EmbedderMismatch { .. } => (StatusCode::CONFLICT, "embedder_mismatch"),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, "http_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
