//! Prompt template for grounded answers

use crate::retrieval::SearchResult;

/// Line placed between context blocks
pub const CONTEXT_DELIMITER: &str = "\n\n-----8<-----\n\n";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the full prompt for `question` over `results`
    ///
    /// The question is inserted verbatim.
    pub fn assemble(results: &[SearchResult], question: &str) -> String {
        format!(
            r#"You are an expert assistant that answers questions using ONLY the documents provided.

RULES:
1. Answer only with information found in the CONTEXT below
2. If the context does not contain enough information, say so clearly
3. Always cite your sources: name the document and page every piece of information comes from
4. Be precise and concise

CONTEXT (excerpts from the documents):
{context}

QUESTION: {question}

ANSWER (with sources):"#,
            context = Self::build_context(results),
            question = question,
        )
    }

    /// One labelled block per result, in retrieval order
    pub fn build_context(results: &[SearchResult]) -> String {
        results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("[{}] {}\n{}", i + 1, r.chunk.source_label(), r.chunk.text))
            .collect::<Vec<_>>()
            .join(CONTEXT_DELIMITER)
    }
}
