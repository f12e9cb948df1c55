//! Recursive character text splitting with page tracking

use crate::error::{Error, Result};
use crate::types::{Chunk, RawUnit};

/// Separators from coarsest to finest; the empty separator splits into characters
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Characters shared between neighbouring chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be > 0".into()));
        }
        if overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Maximum chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap in characters
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split every unit, keeping document then page then position order
    pub fn split(&self, units: &[RawUnit]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for unit in units {
            for (i, text) in self.split_text(&unit.text).into_iter().enumerate() {
                chunks.push(Chunk::from_unit(unit, text, i as u32));
            }
        }

        tracing::debug!("Split {} units into {} chunks", units.len(), chunks.len());
        chunks
    }

    /// Split one text into chunks of at most `chunk_size` characters
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut out = Vec::new();

        // "" is always last and always matches
        let (idx, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(**sep))
            .map(|(i, sep)| (i, *sep))
            .unwrap_or((separators.len().saturating_sub(1), ""));
        let finer = separators.get(idx + 1..).unwrap_or(&[]);

        let mut buffered: Vec<&str> = Vec::new();
        for piece in split_keep_start(text, separator) {
            if char_len(piece) < self.chunk_size {
                buffered.push(piece);
                continue;
            }

            if !buffered.is_empty() {
                out.extend(self.merge(&buffered));
                buffered.clear();
            }

            if finer.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            } else {
                out.extend(self.split_recursive(piece, finer));
            }
        }

        if !buffered.is_empty() {
            out.extend(self.merge(&buffered));
        }

        out
    }

    /// Greedily pack pieces into windows, carrying the window tail over as overlap
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: Vec<(&str, usize)> = Vec::new();
        let mut start = 0usize;
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && start < window.len() {
                push_joined(&mut chunks, &window[start..]);

                while total > self.overlap || (total + len > self.chunk_size && total > 0) {
                    total -= window[start].1;
                    start += 1;
                }
            }

            window.push((*piece, len));
            total += len;
        }

        push_joined(&mut chunks, &window[start..]);
        chunks
    }
}

/// Split text on `separator`, attaching each separator to the piece after it
fn split_keep_start<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut last = 0;
    for (pos, _) in text.match_indices(separator) {
        if pos > last {
            pieces.push(&text[last..pos]);
        }
        last = pos;
    }
    if last < text.len() {
        pieces.push(&text[last..]);
    }
    pieces
}

fn push_joined(chunks: &mut Vec<String>, window: &[(&str, usize)]) {
    let joined: String = window.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
