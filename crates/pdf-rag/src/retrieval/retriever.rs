//! Query-time retrieval: embed the question, search the index

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;

use super::index::{SearchResult, VectorIndex};

/// Retriever bound to one index and the embedder it was built with
pub struct Retriever<'a> {
    index: &'a VectorIndex,
    embedder: &'a dyn EmbeddingProvider,
}

impl<'a> Retriever<'a> {
    pub fn new(index: &'a VectorIndex, embedder: &'a dyn EmbeddingProvider) -> Self {
        Self { index, embedder }
    }

    /// The `k` chunks most similar to `query`, best first
    ///
    /// Fails with `EmbedderMismatch` unless the embedder is the one recorded
    /// in the index manifest.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let identity = self.embedder.identity();
        if identity != self.index.manifest().embedder {
            return Err(Error::EmbedderMismatch {
                expected: identity,
                found: self.index.manifest().embedder.clone(),
            });
        }

        let query_vector = self.embedder.embed(query).await?;
        let results = self.index.search(&query_vector, k)?;

        tracing::debug!(
            "Retrieved {} chunks (best score {:.3})",
            results.len(),
            results.first().map(|r| r.score).unwrap_or(0.0)
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::{BuildParams, IndexLocation};
    use crate::testing::HashEmbedder;
    use crate::types::Chunk;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_retrieves_most_relevant_chunk() {
        let tmp = TempDir::new().unwrap();
        let embedder = HashEmbedder::new(128);
        let chunks = vec![
            Chunk {
                text: "Bananas are yellow fruit.".into(),
                source_file: "fruit.pdf".into(),
                page_number: 1,
                chunk_index: 0,
            },
            Chunk {
                text: "The capital of Italy is Rome.".into(),
                source_file: "italy.pdf".into(),
                page_number: 1,
                chunk_index: 0,
            },
        ];
        let index = VectorIndex::build(
            chunks,
            &embedder,
            &IndexLocation::new(tmp.path(), "docs"),
            BuildParams::default(),
        )
        .await
        .unwrap();

        let retriever = Retriever::new(&index, &embedder);
        let results = retriever
            .retrieve("What is the capital of Italy?", 1)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.source_file, "italy.pdf");
    }

    #[tokio::test]
    async fn test_rejects_embedder_the_index_was_not_built_with() {
        let tmp = TempDir::new().unwrap();
        let embedder = HashEmbedder::new(128);
        let chunks = vec![Chunk {
            text: "The capital of Italy is Rome.".into(),
            source_file: "italy.pdf".into(),
            page_number: 1,
            chunk_index: 0,
        }];
        let index = VectorIndex::build(
            chunks,
            &embedder,
            &IndexLocation::new(tmp.path(), "docs"),
            BuildParams::default(),
        )
        .await
        .unwrap();

        // Same dimensions, different model
        let other = HashEmbedder::new(128).with_model("other-model");
        let err = Retriever::new(&index, &other)
            .retrieve("What is the capital of Italy?", 1)
            .await
            .unwrap_err();

        match err {
            Error::EmbedderMismatch { expected, found } => {
                assert_eq!(expected, other.identity());
                assert_eq!(found, embedder.identity());
            }
            e => panic!("unexpected error: {:?}", e),
        }
    }
}
