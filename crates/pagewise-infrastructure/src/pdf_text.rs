//! PDF inspection backed by lopdf.
//!
//! Parsing and extraction are CPU-bound; async callers run them on the
//! blocking pool.

use lopdf::Document;
use pagewise_core::error::{PagewiseError, Result};

/// A parsed document. Parsing is the expensive part; keep one around to
/// extract several pages.
pub struct ParsedPdf {
    doc: Document,
}

impl std::fmt::Debug for ParsedPdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedPdf")
            .field("pages", &self.doc.get_pages().len())
            .finish()
    }
}

impl ParsedPdf {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| PagewiseError::retrieval(format!("PDF parse error: {}", e)))?;
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> Result<u32> {
        u32::try_from(self.doc.get_pages().len())
            .map_err(|_| PagewiseError::retrieval("page count does not fit in u32"))
    }

    /// Text of one 1-indexed page.
    pub fn page_text(&self, page: u32) -> Result<String> {
        let pages = self.doc.get_pages();
        if !pages.contains_key(&page) {
            return Err(PagewiseError::retrieval(format!(
                "page {} out of range (page_count={})",
                page,
                pages.len()
            )));
        }

        self.doc.extract_text(&[page]).map_err(|e| {
            PagewiseError::retrieval(format!("text extraction failed on page {}: {}", page, e))
        })
    }
}

/// Number of pages in the document. Parses the whole file.
pub fn page_count(bytes: &[u8]) -> Result<u32> {
    ParsedPdf::parse(bytes)?.page_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_http_server::sample_pdf;

    #[test]
    fn test_page_count() {
        let bytes = sample_pdf(&["one", "two", "three"]);
        assert_eq!(page_count(&bytes).unwrap(), 3);
    }

    #[test]
    fn test_page_out_of_range() {
        let parsed = ParsedPdf::parse(&sample_pdf(&["only"])).unwrap();
        let err = parsed.page_text(2).unwrap_err();

        assert!(err.is_retrieval());
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_parsed_pdf_serves_several_pages() {
        let parsed = ParsedPdf::parse(&sample_pdf(&["first", "second"])).unwrap();

        assert_eq!(parsed.page_count().unwrap(), 2);
        assert!(parsed.page_text(1).unwrap().contains("first"));
        assert!(parsed.page_text(2).unwrap().contains("second"));
    }

    #[test]
    fn test_garbage_is_retrieval_error() {
        assert!(page_count(b"definitely not a pdf").unwrap_err().is_retrieval());
    }
}
