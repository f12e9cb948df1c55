//! Page and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};

/// Text of one page of one loaded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUnit {
    /// Extracted page text
    pub text: String,
    /// File name (no directory) of the source PDF
    pub source_file: String,
    /// Page number (1-indexed)
    pub page_number: u32,
}

impl RawUnit {
    /// Create a new page unit
    pub fn new(text: impl Into<String>, source_file: impl Into<String>, page_number: u32) -> Self {
        Self {
            text: text.into(),
            source_file: source_file.into(),
            page_number,
        }
    }
}

/// A chunk of page text, carrying its page provenance unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content
    pub text: String,
    /// Source file name
    pub source_file: String,
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Position of this chunk within its page
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a chunk from a unit's metadata
    pub fn from_unit(unit: &RawUnit, text: String, chunk_index: u32) -> Self {
        Self {
            text,
            source_file: unit.source_file.clone(),
            page_number: unit.page_number,
            chunk_index,
        }
    }

    /// Short source label, e.g. `report.pdf, page 3`
    pub fn source_label(&self) -> String {
        format!("{}, page {}", self.source_file, self.page_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_inherits_unit_metadata() {
        let unit = RawUnit::new("Some page text", "paper.pdf", 7);
        let chunk = Chunk::from_unit(&unit, "page text".to_string(), 2);

        assert_eq!(chunk.source_file, "paper.pdf");
        assert_eq!(chunk.page_number, 7);
        assert_eq!(chunk.chunk_index, 2);
        assert_eq!(chunk.source_label(), "paper.pdf, page 7");
    }
}
