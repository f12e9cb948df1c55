//! Vector index and retrieval

mod index;
mod retriever;

pub use index::{cosine_similarity, BuildParams, IndexLocation, SearchResult, VectorIndex};
pub use retriever::Retriever;
