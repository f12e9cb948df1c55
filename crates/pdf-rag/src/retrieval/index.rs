//! Persisted vector index with exact cosine search

use chrono::Utc;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::{EmbedderIdentity, EmbeddingProvider};
use crate::storage::IndexDb;
use crate::types::{Chunk, IndexManifest, IndexedDocument, IndexedEntry};

/// Where a collection lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexLocation {
    persist_dir: PathBuf,
    collection: String,
}

impl IndexLocation {
    pub fn new(persist_dir: impl Into<PathBuf>, collection: impl Into<String>) -> Self {
        Self {
            persist_dir: persist_dir.into(),
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// `<persist_dir>/<collection>.sqlite`
    pub fn file(&self) -> PathBuf {
        self.persist_dir.join(format!("{}.sqlite", self.collection))
    }

    /// Scratch directory a rebuild writes into before it is swapped in
    fn staging_dir(&self) -> PathBuf {
        self.persist_dir.join(format!(".{}.staging", self.collection))
    }

    /// True when a committed index file exists
    pub fn exists(&self) -> bool {
        self.file().is_file()
    }
}

impl fmt::Display for IndexLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file().display())
    }
}

/// Build-time parameters recorded in the manifest
#[derive(Debug, Clone, Default)]
pub struct BuildParams {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub documents: Vec<IndexedDocument>,
}

/// Search result with chunk and similarity
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (higher is better)
    pub score: f32,
}

/// In-memory copy of a committed index
pub struct VectorIndex {
    location: IndexLocation,
    manifest: IndexManifest,
    entries: Vec<IndexedEntry>,
}

impl VectorIndex {
    /// Embed `chunks` and persist them, replacing whatever `location` held
    ///
    /// The collection is written to a staging directory first and renamed over
    /// the committed file only once complete; a failure leaves the previous index
    /// untouched.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: &dyn EmbeddingProvider,
        location: &IndexLocation,
        params: BuildParams,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::NothingToIndex);
        }

        let identity = embedder.identity();
        tracing::info!("Embedding {} chunks with {}", chunks.len(), identity);

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != identity.dimensions) {
            return Err(Error::embedding(format!(
                "vector has {} dimensions, expected {}",
                bad.len(),
                identity.dimensions
            )));
        }

        let entries: Vec<IndexedEntry> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexedEntry {
                id: Uuid::new_v4().to_string(),
                vector,
                chunk,
            })
            .collect();

        let manifest = IndexManifest {
            collection: location.collection().to_string(),
            embedder: identity,
            chunk_size: params.chunk_size,
            chunk_overlap: params.chunk_overlap,
            entry_count: entries.len(),
            documents: params.documents,
            built_at: Utc::now(),
        };

        Self::commit(location, &manifest, &entries)?;

        tracing::info!("Index committed at {} ({} entries)", location, entries.len());

        Ok(Self {
            location: location.clone(),
            manifest,
            entries,
        })
    }

    /// Write into staging, then swap the file in
    fn commit(location: &IndexLocation, manifest: &IndexManifest, entries: &[IndexedEntry]) -> Result<()> {
        let staging = location.staging_dir();
        if staging.exists() {
            std::fs::remove_dir_all(&staging)?;
        }
        std::fs::create_dir_all(&staging)?;

        let staged_file = staging.join(format!("{}.sqlite", location.collection()));
        {
            let mut db = IndexDb::create(&staged_file)?;
            db.insert_entries(entries)?;
            db.write_manifest(manifest)?;
        }

        // rename replaces the target in one step
        std::fs::rename(&staged_file, location.file())?;
        std::fs::remove_dir_all(&staging)?;
        Ok(())
    }

    /// Load a committed index without re-embedding anything
    pub fn open(location: &IndexLocation, expected: &EmbedderIdentity) -> Result<Self> {
        if !location.exists() {
            return Err(Error::IndexNotFound(location.to_string()));
        }

        let db = IndexDb::open(location.file())?;
        let manifest = db
            .read_manifest()?
            .ok_or_else(|| Error::IndexNotFound(location.to_string()))?;

        if db.entry_count()? == 0 {
            return Err(Error::EmptyIndex(location.to_string()));
        }

        if &manifest.embedder != expected {
            return Err(Error::EmbedderMismatch {
                expected: expected.clone(),
                found: manifest.embedder,
            });
        }

        let entries = db.load_entries(manifest.embedder.dimensions)?;
        tracing::info!("Opened index {} ({} entries)", location, entries.len());

        Ok(Self {
            location: location.clone(),
            manifest,
            entries,
        })
    }

    /// Top `k` entries by cosine similarity, best first; ties keep insertion order
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        let dimensions = self.manifest.embedder.dimensions;
        if query.len() != dimensions {
            return Err(Error::embedding(format!(
                "query vector has {} dimensions, index expects {}",
                query.len(),
                dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(query, &e.vector)))
            .collect();

        // Stable sort keeps earlier entries ahead on equal scores
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| SearchResult {
                chunk: self.entries[i].chunk.clone(),
                score,
            })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }

    pub fn location(&self) -> &IndexLocation {
        &self.location
    }

    pub fn entries(&self) -> &[IndexedEntry] {
        &self.entries
    }
}

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
