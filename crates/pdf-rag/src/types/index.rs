//! Persisted index records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::providers::EmbedderIdentity;

use super::document::Chunk;

/// One embedded chunk
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEntry {
    /// Opaque identifier (UUID v4)
    pub id: String,
    /// Embedding of `chunk.text`
    pub vector: Vec<f32>,
    /// The chunk itself
    pub chunk: Chunk,
}

/// A document that contributed entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub filename: String,
    /// SHA-256 of the file bytes
    pub content_hash: String,
    /// Pages in the file
    pub pages: u32,
    /// Chunks the file produced
    pub chunks: usize,
}

/// Describes how an index was built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub collection: String,
    /// Embedder that produced every vector in the index
    pub embedder: EmbedderIdentity,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub entry_count: usize,
    pub documents: Vec<IndexedDocument>,
    pub built_at: DateTime<Utc>,
}
