//! Answer and citation types

use serde::{Deserialize, Serialize};

use super::document::Chunk;

/// Citation pointing back at a retrieved chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Source file name
    pub document: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Leading characters of the chunk text (always a prefix of it)
    pub excerpt: String,
    /// True when the excerpt is shorter than the chunk
    pub truncated: bool,
    /// Cosine similarity of the chunk to the question
    pub score: f32,
    /// Position of the chunk within its page
    pub chunk_index: u32,
}

impl Citation {
    /// Create a citation from a chunk, keeping at most `excerpt_chars` characters
    pub fn from_chunk(chunk: &Chunk, score: f32, excerpt_chars: usize) -> Self {
        let (excerpt, truncated) = match chunk.text.char_indices().nth(excerpt_chars) {
            Some((byte_idx, _)) => (chunk.text[..byte_idx].to_string(), true),
            None => (chunk.text.clone(), false),
        };

        Self {
            document: chunk.source_file.clone(),
            page: chunk.page_number,
            excerpt,
            truncated,
            score,
            chunk_index: chunk.chunk_index,
        }
    }

    /// Format citation for display in text
    pub fn format_inline(&self) -> String {
        format!("[Source: {}, Page {}]", self.document, self.page)
    }

    /// Excerpt with an ellipsis when it was cut short
    pub fn display_excerpt(&self) -> String {
        if self.truncated {
            format!("{}...", self.excerpt)
        } else {
            self.excerpt.clone()
        }
    }
}

/// Final result of one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Generated answer text
    pub answer_text: String,
    /// Citations in retrieval order
    pub citations: Vec<Citation>,
}
