//! Full index rebuild: load, chunk, embed, persist

use std::time::Instant;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::{DocumentLoader, TextChunker};
use crate::providers::EmbeddingProvider;
use crate::retrieval::{BuildParams, IndexLocation, VectorIndex};
use crate::types::{IndexSummary, IndexedDocument};

/// A freshly built index plus what went into it
pub struct IndexOutcome {
    pub index: VectorIndex,
    pub summary: IndexSummary,
}

/// Rebuild the configured collection from the documents directory
pub async fn index_documents(
    config: &RagConfig,
    embedder: &dyn EmbeddingProvider,
) -> Result<IndexOutcome> {
    let start = Instant::now();
    let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;

    let documents_dir = config.paths.documents_dir.clone();
    tracing::info!("Indexing PDF in {}", documents_dir.display());

    // PDF parsing is CPU bound
    let report = {
        let dir = documents_dir.clone();
        tokio::task::spawn_blocking(move || DocumentLoader::load(&dir))
            .await
            .map_err(|e| Error::internal(format!("Loader task failed: {}", e)))?
    };

    if report.is_empty() {
        return Err(Error::NoDocumentsFound(documents_dir.display().to_string()));
    }

    let chunks = chunker.split(&report.units);
    tracing::info!(
        "Split {} pages into {} chunks (size {}, overlap {})",
        report.units.len(),
        chunks.len(),
        chunker.chunk_size(),
        chunker.overlap()
    );

    let documents: Vec<IndexedDocument> = report
        .documents
        .iter()
        .map(|doc| IndexedDocument {
            filename: doc.filename.clone(),
            content_hash: doc.content_hash.clone(),
            pages: doc.total_pages,
            chunks: chunks
                .iter()
                .filter(|c| c.source_file == doc.filename)
                .count(),
        })
        .collect();

    let location = IndexLocation::new(&config.paths.persist_dir, &config.paths.collection);
    let chunk_count = chunks.len();
    let index = VectorIndex::build(
        chunks,
        embedder,
        &location,
        BuildParams {
            chunk_size: chunker.chunk_size(),
            chunk_overlap: chunker.overlap(),
            documents,
        },
    )
    .await?;

    let summary = IndexSummary {
        documents: report.documents.len(),
        pages: report.units.len(),
        chunks: chunk_count,
        failed: report.failures,
        processing_time_ms: start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        "Indexed {} documents, {} pages, {} chunks in {}ms",
        summary.documents,
        summary.pages,
        summary.chunks,
        summary.processing_time_ms
    );

    Ok(IndexOutcome { index, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::HashEmbedder;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_directory_is_no_documents() {
        let tmp = TempDir::new().unwrap();
        let mut config = RagConfig::default();
        config.paths.documents_dir = tmp.path().join("docs");
        config.paths.persist_dir = tmp.path().join("index");
        std::fs::create_dir_all(&config.paths.documents_dir).unwrap();

        let err = index_documents(&config, &HashEmbedder::new(32))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::NoDocumentsFound(_)));
        assert!(!config.paths.persist_dir.exists());
    }

    #[tokio::test]
    async fn test_only_corrupt_files_is_no_documents() {
        let tmp = TempDir::new().unwrap();
        let mut config = RagConfig::default();
        config.paths.documents_dir = tmp.path().to_path_buf();
        config.paths.persist_dir = tmp.path().join("index");
        std::fs::write(tmp.path().join("broken.pdf"), b"garbage").unwrap();

        let err = index_documents(&config, &HashEmbedder::new(32))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::NoDocumentsFound(_)));
    }
}
