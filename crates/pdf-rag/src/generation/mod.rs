//! Answer generation with LLM and citation handling

pub mod citation;
pub mod ollama;
pub mod prompt;

pub use citation::{build_citations, format_sources};
pub use ollama::OllamaClient;
pub use prompt::{PromptBuilder, CONTEXT_DELIMITER};
