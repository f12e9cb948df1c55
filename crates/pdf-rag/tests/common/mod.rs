#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pdf_rag::{
    EmbedderIdentity, EmbeddingProvider, Error, LlmProvider, RagConfig, RagSession, Result,
};

/// Bag-of-words embedder hashing each lowercased word into a bucket
pub struct WordHashEmbedder {
    pub dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for WordHashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hash: u64 = 0xcbf29ce484222325;
            for b in word.to_lowercase().bytes() {
                hash ^= b as u64;
                hash = hash.wrapping_mul(0x100000001b3);
            }
            vector[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(vector)
    }

    fn identity(&self) -> EmbedderIdentity {
        EmbedderIdentity::new("test", "word-hash", self.dimensions)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "test"
    }
}

/// Generator that counts calls and echoes a canned answer
pub struct CannedLlm {
    pub answer: String,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    pub up: bool,
}

impl CannedLlm {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            up: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for CannedLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.up {
            return Err(Error::GenerationUnavailable("down".into()));
        }
        self.prompts.lock().push(prompt.to_string());
        Ok(self.answer.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.up)
    }

    fn name(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "canned"
    }
}

/// Single-page PDF showing `phrase` in Helvetica
pub fn minimal_pdf_with_phrase(phrase: &str) -> Vec<u8> {
    let escaped = phrase
        .replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)");
    let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", escaped);

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let o1 = out.len();
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
    let o2 = out.len();
    out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
    let o3 = out.len();
    out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
    let o4 = out.len();
    out.extend_from_slice(
        format!(
            "4 0 obj << /Length {} >> stream\n{}\nendstream endobj\n",
            content.len(),
            content
        )
        .as_bytes(),
    );
    let o5 = out.len();
    out.extend_from_slice(
        b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
    );
    let xref_start = out.len();
    out.extend_from_slice(b"xref\n0 6\n");
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in [o1, o2, o3, o4, o5] {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
    out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
    out.extend_from_slice(b"%%EOF\n");
    out
}

pub fn write_pdf(dir: &Path, name: &str, phrase: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), minimal_pdf_with_phrase(phrase)).unwrap();
}

/// Config rooted in a scratch directory
pub fn scratch_config(root: &Path) -> RagConfig {
    let mut config = RagConfig::default();
    config.paths.documents_dir = root.join("documents");
    config.paths.persist_dir = root.join("index");
    config.paths.collection = "test".to_string();
    config
}

pub fn session(config: RagConfig, llm: Arc<CannedLlm>) -> RagSession {
    RagSession::new(config, Arc::new(WordHashEmbedder { dimensions: 128 }), llm)
}
