//! pdf-rag: question answering over a folder of PDF files
//!
//! Pages are extracted from every PDF in a directory, split into overlapping
//! chunks, embedded and persisted in a SQLite-backed vector index. Questions are
//! answered by a local Ollama model from the most similar chunks, with every
//! answer citing the source document and page.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::{index_documents, Answerer, RagSession};
pub use providers::{EmbedderIdentity, EmbeddingProvider, LlmProvider};
pub use retrieval::{IndexLocation, SearchResult, VectorIndex};
pub use types::{AnswerRecord, Chunk, Citation, IndexSummary, QueryRequest, RawUnit};
