//! Document text extraction
//!
//! The extraction stage is isolated behind the [`DocumentExtractor`] trait so
//! the pipeline never depends on a concrete document format. The built-in
//! [`TextDocumentExtractor`] handles plain-text documents with form-feed page
//! breaks; other formats plug in at the same seam.

mod text;

pub use text::TextDocumentExtractor;

use async_trait::async_trait;
use std::path::Path;

/// An opened document, ready for page-by-page text extraction
///
/// Page indices are zero-based and must be below [`page_count`](Self::page_count).
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Extract the text of one page
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the page content
    /// cannot be decoded.
    async fn extract_page(&self, index: usize) -> crate::Result<String>;
}

/// Trait for opening documents for text extraction
///
/// Implementations parse a source file and expose its content page by page,
/// letting the pipeline report per-page progress and honor cancellation
/// between pages.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Open a document file for extraction
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid document
    /// of the supported format.
    async fn open(&self, path: &Path) -> crate::Result<Box<dyn PageSource>>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
