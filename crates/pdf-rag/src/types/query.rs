//! Request and summary types shared by the CLI and the HTTP API

use serde::{Deserialize, Serialize};

/// Question submitted to the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,
}

/// Outcome of one indexing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSummary {
    /// Documents that contributed at least one page
    pub documents: usize,
    /// Pages with extractable text
    pub pages: usize,
    /// Chunks written to the index
    pub chunks: usize,
    /// Documents skipped because they could not be read
    pub failed: Vec<FailedDocument>,
    /// Wall time in milliseconds
    pub processing_time_ms: u64,
}

/// A document the loader had to skip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedDocument {
    /// File name
    pub filename: String,
    /// Reason
    pub message: String,
}
