//! Plain-text document extractor with form-feed page breaks

use super::{DocumentExtractor, PageSource};
use async_trait::async_trait;
use std::path::Path;

/// Extractor for plain UTF-8 text documents
///
/// Pages are delimited by the form-feed character (`\x0c`), matching how
/// paginated text exports mark page boundaries. A document without any
/// form feeds is treated as a single page.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextDocumentExtractor;

impl TextDocumentExtractor {
    /// Create a new text extractor
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for TextDocumentExtractor {
    async fn open(&self, path: &Path) -> crate::Result<Box<dyn PageSource>> {
        let bytes = tokio::fs::read(path).await?;
        let text = String::from_utf8(bytes).map_err(|e| {
            crate::Error::Extraction(format!("document is not valid UTF-8: {}", e))
        })?;

        let pages: Vec<String> = text.split('\x0c').map(str::to_string).collect();
        Ok(Box::new(TextPages { pages }))
    }

    fn name(&self) -> &'static str {
        "text"
    }
}

struct TextPages {
    pages: Vec<String>,
}

#[async_trait]
impl PageSource for TextPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn extract_page(&self, index: usize) -> crate::Result<String> {
        self.pages.get(index).cloned().ok_or_else(|| {
            crate::Error::Extraction(format!(
                "page index {} out of range (document has {} pages)",
                index,
                self.pages.len()
            ))
        })
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_document(content: &[u8]) -> crate::Result<Box<dyn PageSource>> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");
        tokio::fs::write(&path, content).await.unwrap();
        TextDocumentExtractor::new().open(&path).await
    }

    #[tokio::test]
    async fn single_page_document_without_form_feeds() {
        let source = open_document(b"Hello world, this is one page.")
            .await
            .unwrap();

        assert_eq!(source.page_count(), 1);
        let page = source.extract_page(0).await.unwrap();
        assert_eq!(page, "Hello world, this is one page.");
    }

    #[tokio::test]
    async fn form_feeds_split_pages_in_order() {
        let source = open_document(b"page one\x0cpage two\x0cpage three")
            .await
            .unwrap();

        assert_eq!(source.page_count(), 3);
        assert_eq!(source.extract_page(0).await.unwrap(), "page one");
        assert_eq!(source.extract_page(1).await.unwrap(), "page two");
        assert_eq!(source.extract_page(2).await.unwrap(), "page three");
    }

    #[tokio::test]
    async fn empty_document_is_one_empty_page() {
        let source = open_document(b"").await.unwrap();

        assert_eq!(source.page_count(), 1);
        assert_eq!(source.extract_page(0).await.unwrap(), "");
    }

    #[tokio::test]
    async fn out_of_range_page_index_is_an_extraction_error() {
        let source = open_document(b"only page").await.unwrap();

        let err = source.extract_page(5).await.unwrap_err();
        assert!(matches!(err, crate::Error::Extraction(_)));
    }

    #[tokio::test]
    async fn invalid_utf8_is_an_extraction_error() {
        let result = open_document(&[0xff, 0xfe, 0x00]).await;

        match result {
            Err(crate::Error::Extraction(msg)) => {
                assert!(msg.contains("not valid UTF-8"), "got: {msg}");
            }
            Err(other) => panic!("expected Extraction error, got {other:?}"),
            Ok(_) => panic!("expected Extraction error, got an opened document"),
        }
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = TextDocumentExtractor::new()
            .open(Path::new("/nonexistent/doc.txt"))
            .await;

        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
