//! Question answering over a built index

use std::fmt;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::generation::{build_citations, PromptBuilder};
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::{Retriever, VectorIndex};
use crate::types::AnswerRecord;

/// Where an `ask` call currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskPhase {
    Idle,
    Retrieving,
    Generating,
    Done,
    Failed,
}

impl fmt::Display for AskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AskPhase::Idle => "idle",
            AskPhase::Retrieving => "retrieving",
            AskPhase::Generating => "generating",
            AskPhase::Done => "done",
            AskPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Retrieve, prompt, generate, cite
pub struct Answerer<'a> {
    embedder: &'a dyn EmbeddingProvider,
    llm: &'a dyn LlmProvider,
    top_k: usize,
    excerpt_chars: usize,
    /// Shown in "no index" errors
    index_label: String,
}

impl<'a> Answerer<'a> {
    pub fn new(
        embedder: &'a dyn EmbeddingProvider,
        llm: &'a dyn LlmProvider,
        retrieval: &RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            llm,
            top_k: retrieval.top_k,
            excerpt_chars: retrieval.excerpt_chars,
            index_label: "index".to_string(),
        }
    }

    /// Name the index location in errors
    pub fn with_index_label(mut self, label: impl Into<String>) -> Self {
        self.index_label = label.into();
        self
    }

    /// Answer `question` from `index`
    ///
    /// Without a usable index the generator is never called.
    pub async fn ask(&self, question: &str, index: Option<&VectorIndex>) -> Result<AnswerRecord> {
        let mut phase = AskPhase::Idle;
        let result = self.run(question, index, &mut phase).await;

        match &result {
            Ok(record) => {
                advance(&mut phase, AskPhase::Done);
                tracing::info!("Answered with {} citations", record.citations.len());
            }
            Err(e) => {
                let failed_in = phase;
                advance(&mut phase, AskPhase::Failed);
                tracing::warn!("Question failed while {}: {}", failed_in, e);
            }
        }

        result
    }

    async fn run(
        &self,
        question: &str,
        index: Option<&VectorIndex>,
        phase: &mut AskPhase,
    ) -> Result<AnswerRecord> {
        if question.trim().is_empty() {
            return Err(Error::InvalidRequest("question must not be empty".into()));
        }

        let index = match index {
            Some(index) if index.is_empty() => {
                return Err(Error::EmptyIndex(self.index_label.clone()))
            }
            Some(index) => index,
            None => return Err(Error::IndexNotFound(self.index_label.clone())),
        };

        advance(phase, AskPhase::Retrieving);
        let results = Retriever::new(index, self.embedder)
            .retrieve(question, self.top_k)
            .await?;

        advance(phase, AskPhase::Generating);
        let prompt = PromptBuilder::assemble(&results, question);
        let answer_text = self.llm.generate(&prompt).await?;

        Ok(AnswerRecord {
            answer_text: answer_text.trim().to_string(),
            citations: build_citations(&results, self.excerpt_chars),
        })
    }
}

fn advance(phase: &mut AskPhase, next: AskPhase) {
    tracing::debug!("ask: {} -> {}", phase, next);
    *phase = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::{BuildParams, IndexLocation};
    use crate::testing::{HashEmbedder, RecordingLlm};
    use crate::types::Chunk;
    use tempfile::TempDir;

    async fn build_index(tmp: &TempDir, embedder: &HashEmbedder) -> VectorIndex {
        let chunks = vec![
            Chunk {
                text: "The capital of Italy is Rome.".into(),
                source_file: "italy.pdf".into(),
                page_number: 1,
                chunk_index: 0,
            },
            Chunk {
                text: "Cats sleep for most of the day.".into(),
                source_file: "cats.pdf".into(),
                page_number: 3,
                chunk_index: 0,
            },
        ];
        VectorIndex::build(
            chunks,
            embedder,
            &IndexLocation::new(tmp.path(), "docs"),
            BuildParams::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_no_index_never_calls_generator() {
        let embedder = HashEmbedder::new(64);
        let llm = RecordingLlm::new("unused");
        let answerer = Answerer::new(&embedder, &llm, &RetrievalConfig::default());

        let err = answerer.ask("Anything?", None).await.unwrap_err();
        assert!(matches!(err, Error::IndexNotFound(_)));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let embedder = HashEmbedder::new(64);
        let llm = RecordingLlm::new("unused");
        let answerer = Answerer::new(&embedder, &llm, &RetrievalConfig::default());

        let err = answerer.ask("   ", None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_answer_cites_retrieved_chunks_in_order() {
        let tmp = TempDir::new().unwrap();
        let embedder = HashEmbedder::new(64);
        let index = build_index(&tmp, &embedder).await;
        let llm = RecordingLlm::new("  Rome [italy.pdf, page 1]\n");
        let answerer = Answerer::new(&embedder, &llm, &RetrievalConfig::default());

        let record = answerer
            .ask("What is the capital of Italy?", Some(&index))
            .await
            .unwrap();

        assert_eq!(record.answer_text, "Rome [italy.pdf, page 1]");
        assert_eq!(record.citations.len(), 2);
        assert_eq!(record.citations[0].document, "italy.pdf");
        assert_eq!(record.citations[0].page, 1);
        assert!(record.citations[0].score >= record.citations[1].score);

        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains("QUESTION: What is the capital of Italy?"));
        assert!(prompt.contains("[1] italy.pdf, page 1"));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_generator_failure_aborts() {
        let tmp = TempDir::new().unwrap();
        let embedder = HashEmbedder::new(64);
        let index = build_index(&tmp, &embedder).await;
        let llm = RecordingLlm::unreachable();
        let answerer = Answerer::new(&embedder, &llm, &RetrievalConfig::default());

        let err = answerer.ask("Rome?", Some(&index)).await.unwrap_err();
        assert!(matches!(err, Error::GenerationUnavailable(_)));
    }

    #[tokio::test]
    async fn test_foreign_embedder_never_reaches_generator() {
        let tmp = TempDir::new().unwrap();
        let embedder = HashEmbedder::new(64);
        let index = build_index(&tmp, &embedder).await;
        let other = HashEmbedder::new(64).with_model("other-model");
        let llm = RecordingLlm::new("unused");
        let answerer = Answerer::new(&other, &llm, &RetrievalConfig::default());

        let err = answerer.ask("Rome?", Some(&index)).await.unwrap_err();
        assert!(matches!(err, Error::EmbedderMismatch { .. }));
        assert_eq!(llm.calls(), 0);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(AskPhase::Retrieving.to_string(), "retrieving");
        assert_eq!(AskPhase::Failed.to_string(), "failed");
    }
}
