//! Citation building from retrieval results

use crate::retrieval::SearchResult;
use crate::types::response::Citation;

/// One citation per result, in retrieval order
pub fn build_citations(results: &[SearchResult], excerpt_chars: usize) -> Vec<Citation> {
    results
        .iter()
        .map(|r| Citation::from_chunk(&r.chunk, r.score, excerpt_chars))
        .collect()
}

/// Render citations as a numbered source list for terminal output
pub fn format_sources(citations: &[Citation]) -> String {
    citations
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "[{}] {} (score {:.2})\n    {}",
                i + 1,
                c.format_inline(),
                c.score,
                c.display_excerpt().replace('\n', " ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    #[test]
    fn test_citations_follow_retrieval_order() {
        let results: Vec<SearchResult> = [("b.pdf", 2, 0.9), ("a.pdf", 5, 0.4)]
            .into_iter()
            .map(|(file, page, score)| SearchResult {
                chunk: Chunk {
                    text: "Some long chunk text".into(),
                    source_file: file.into(),
                    page_number: page,
                    chunk_index: 0,
                },
                score,
            })
            .collect();

        let citations = build_citations(&results, 4);
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].document, "b.pdf");
        assert_eq!(citations[1].page, 5);
        assert_eq!(citations[0].excerpt, "Some");

        let rendered = format_sources(&citations);
        assert!(rendered.starts_with("[1] [Source: b.pdf, Page 2]"));
        assert!(rendered.contains("Some..."));
    }
}
