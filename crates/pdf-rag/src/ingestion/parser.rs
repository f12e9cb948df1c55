//! Page-level PDF text extraction

use sha2::{Digest, Sha256};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// Seconds a whole-document fallback extraction may run before it is abandoned
const FALLBACK_TIMEOUT_SECS: u64 = 60;

/// Typographic characters folded to plain ASCII before chunking
const GLYPH_FOLDS: &[(char, &str)] = &[
    ('\u{2010}', "-"),   // Hyphen
    ('\u{2011}', "-"),   // Non-breaking hyphen
    ('\u{2013}', "-"),   // En dash
    ('\u{2014}', "--"),  // Em dash
    ('\u{2018}', "'"),   // Left single quote
    ('\u{2019}', "'"),   // Right single quote
    ('\u{201C}', "\""),  // Left double quote
    ('\u{201D}', "\""),  // Right double quote
    ('\u{2022}', "* "),  // Bullet
    ('\u{2026}', "..."), // Ellipsis
    ('\u{00A0}', " "),   // Non-breaking space
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Text of a single page
#[derive(Debug, Clone)]
pub struct PageText {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Cleaned page text (may be empty for image-only pages)
    pub text: String,
}

/// A parsed PDF
#[derive(Debug, Clone)]
pub struct ParsedPdf {
    /// Pages in page-tree order
    pub pages: Vec<PageText>,
    /// Number of pages in the file
    pub total_pages: u32,
    /// SHA-256 of the raw file bytes
    pub content_hash: String,
}

impl ParsedPdf {
    /// Pages that carry any text
    pub fn text_pages(&self) -> impl Iterator<Item = &PageText> {
        self.pages.iter().filter(|p| !p.text.trim().is_empty())
    }
}

/// PDF parser
pub struct PdfParser;

impl PdfParser {
    /// Parse a PDF into per-page text
    ///
    /// Pages are read through lopdf. When lopdf cannot open the file the whole
    /// document is extracted with pdf-extract and reported as page 1.
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedPdf> {
        let content_hash = hash_bytes(data);

        let (pages, total_pages) = match contain_panic(|| Self::extract_pages(data)) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("lopdf could not read '{}': {}, trying pdf-extract", filename, e);
                let text = Self::extract_whole_with_timeout(data)
                    .map_err(|e| Error::document_load(filename, e))?;
                let page = PageText {
                    page_number: 1,
                    text: cleanup_pdf_text(&text),
                };
                (vec![page], 1)
            }
        };

        let parsed = ParsedPdf {
            pages,
            total_pages,
            content_hash,
        };

        if parsed.text_pages().next().is_none() {
            return Err(Error::document_load(
                filename,
                "No text content could be extracted from PDF",
            ));
        }

        Ok(parsed)
    }

    /// Extract every page through lopdf's page tree
    fn extract_pages(data: &[u8]) -> std::result::Result<(Vec<PageText>, u32), String> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| e.to_string())?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let total_pages = page_numbers.len() as u32;

        let mut pages = Vec::with_capacity(page_numbers.len());
        for page_number in page_numbers {
            let text = match doc.extract_text(&[page_number]) {
                Ok(text) => cleanup_pdf_text(&text),
                Err(e) => {
                    tracing::debug!("No text on page {}: {}", page_number, e);
                    String::new()
                }
            };
            pages.push(PageText { page_number, text });
        }

        Ok((pages, total_pages))
    }

    /// Whole-document extraction with a timeout against pathological fonts
    fn extract_whole_with_timeout(data: &[u8]) -> std::result::Result<String, String> {
        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(Duration::from_secs(FALLBACK_TIMEOUT_SECS)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(format!("pdf-extract failed: {}", e)),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(format!(
                "PDF extraction timed out after {}s",
                FALLBACK_TIMEOUT_SECS
            )),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err("PDF extraction thread crashed".to_string())
            }
        }
    }
}

/// Run `f`, turning a panic inside it into an error
fn contain_panic<T>(
    f: impl FnOnce() -> std::result::Result<T, String>,
) -> std::result::Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(format!("PDF reader panicked: {}", message))
    })
}

/// Normalise extracted PDF text while keeping paragraph breaks
pub fn cleanup_pdf_text(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\0' {
            continue;
        }
        match GLYPH_FOLDS.iter().find(|(glyph, _)| *glyph == ch) {
            Some((_, replacement)) => folded.push_str(replacement),
            None => folded.push(ch),
        }
    }

    let mut out = String::with_capacity(folded.len());
    let mut blank_run = 0usize;
    for line in folded.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(line.trim_start());
        blank_run = 0;
    }

    out
}

fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
