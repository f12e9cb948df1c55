//! In-process doubles for the provider traits

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::providers::{EmbedderIdentity, EmbeddingProvider, LlmProvider};

/// Deterministic bag-of-words embedder: each lowercased word bumps one bucket
pub struct HashEmbedder {
    dimensions: usize,
    model: String,
    fail: bool,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            model: "hash-bow".to_string(),
            fail: false,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Every call fails as if the server were down
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn bucket(&self, word: &str) -> usize {
        // FNV-1a
        let mut hash: u64 = 0xcbf29ce484222325;
        for b in word.bytes() {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        (hash % self.dimensions as u64) as usize
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(Error::EmbeddingUnavailable("hash embedder is down".into()));
        }

        let mut vector = vec![0.0f32; self.dimensions];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            vector[self.bucket(&word.to_lowercase())] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(vector)
    }

    fn identity(&self) -> EmbedderIdentity {
        EmbedderIdentity::new("test", &self.model, self.dimensions)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    fn name(&self) -> &str {
        "test"
    }
}

/// Generator that records prompts and answers with a fixed text
pub struct RecordingLlm {
    answer: String,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    healthy: bool,
}

impl RecordingLlm {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            healthy: true,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            healthy: false,
            ..Self::new("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for RecordingLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.healthy {
            return Err(Error::GenerationUnavailable("recording llm is down".into()));
        }
        self.prompts.lock().push(prompt.to_string());
        Ok(self.answer.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy)
    }

    fn name(&self) -> &str {
        "recording"
    }

    fn model(&self) -> &str {
        "recording-model"
    }
}
