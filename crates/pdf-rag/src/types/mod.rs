//! Core types for the RAG pipeline

pub mod document;
pub mod index;
pub mod query;
pub mod response;

pub use document::{Chunk, RawUnit};
pub use index::{IndexManifest, IndexedDocument, IndexedEntry};
pub use query::{FailedDocument, IndexSummary, QueryRequest};
pub use response::{AnswerRecord, Citation};
