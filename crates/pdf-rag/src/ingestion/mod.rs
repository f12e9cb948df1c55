//! Document ingestion: PDF loading and chunking

mod chunker;
mod loader;
mod parser;

pub use chunker::TextChunker;
pub use loader::{DocumentLoader, LoadReport, LoadedDocument};
pub use parser::{cleanup_pdf_text, PageText, ParsedPdf, PdfParser};
