//! Directory loader producing page units

use std::path::Path;
use walkdir::WalkDir;

use crate::error::Error;
use crate::types::{FailedDocument, RawUnit};

use super::parser::PdfParser;

/// Supported document extension
const PDF_EXTENSION: &str = "pdf";

/// A document that contributed pages
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// File name
    pub filename: String,
    /// SHA-256 of the file bytes
    pub content_hash: String,
    /// Pages in the file
    pub total_pages: u32,
    /// Pages that yielded text
    pub text_pages: u32,
}

/// Everything one directory scan produced
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Page units in file-name then page order
    pub units: Vec<RawUnit>,
    /// Documents that loaded
    pub documents: Vec<LoadedDocument>,
    /// Documents that were skipped
    pub failures: Vec<FailedDocument>,
}

impl LoadReport {
    /// True when nothing could be loaded
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Loads every PDF in a flat directory
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load all PDFs in `dir` (non-recursive)
    ///
    /// A document that fails to parse is logged and skipped. A missing or empty
    /// directory yields an empty report.
    pub fn load(dir: &Path) -> LoadReport {
        let mut report = LoadReport::default();

        let files = Self::list_documents(dir);
        if files.is_empty() {
            tracing::warn!("No PDF found in {}", dir.display());
            return report;
        }

        for filename in files {
            let path = dir.join(&filename);
            tracing::info!("Loading {}", filename);

            let parsed = std::fs::read(&path)
                .map_err(|e| Error::document_load(&filename, e.to_string()))
                .and_then(|data| PdfParser::parse(&filename, &data));

            match parsed {
                Ok(parsed) => {
                    let before = report.units.len();
                    report.units.extend(
                        parsed
                            .text_pages()
                            .map(|page| RawUnit::new(page.text.clone(), &filename, page.page_number)),
                    );
                    let text_pages = (report.units.len() - before) as u32;
                    tracing::info!("  loaded {} of {} pages", text_pages, parsed.total_pages);

                    report.documents.push(LoadedDocument {
                        filename,
                        content_hash: parsed.content_hash,
                        total_pages: parsed.total_pages,
                        text_pages,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", filename, e);
                    let message = match e {
                        Error::DocumentLoad { message, .. } => message,
                        other => other.to_string(),
                    };
                    report.failures.push(FailedDocument { filename, message });
                }
            }
        }

        tracing::info!(
            "Loaded {} pages from {} PDF ({} skipped)",
            report.units.len(),
            report.documents.len(),
            report.failures.len()
        );

        report
    }

    /// PDF file names in `dir`, sorted
    pub fn list_documents(dir: &Path) -> Vec<String> {
        if !dir.is_dir() {
            return Vec::new();
        }

        let mut names: Vec<String> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map_or(false, |ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
            })
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();

        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_dir_is_empty_not_error() {
        let report = DocumentLoader::load(Path::new("/definitely/not/here"));
        assert!(report.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_lists_only_top_level_pdfs() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("b.pdf"), b"x").unwrap();
        std::fs::write(tmp.path().join("A.PDF"), b"x").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        std::fs::write(tmp.path().join("nested").join("c.pdf"), b"x").unwrap();

        let names = DocumentLoader::list_documents(tmp.path());
        assert_eq!(names, vec!["A.PDF".to_string(), "b.pdf".to_string()]);
    }

    #[test]
    fn test_corrupt_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("corrupt.pdf"), b"not a pdf at all").unwrap();

        let report = DocumentLoader::load(tmp.path());
        assert!(report.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].filename, "corrupt.pdf");
    }
}
