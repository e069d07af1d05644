//! Document source trait.
//!
//! Defines the interface for retrieving document bytes and page text.

use super::model::{DocumentHandle, DocumentId};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract source of document content.
///
/// Implementations may fetch from a remote store, read from a local cache, or
/// both; the reading session only sees this contract.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Retrieves the raw bytes for a document.
    ///
    /// # Returns
    ///
    /// - `Ok(DocumentHandle)`: Bytes loaded, page count attached when known
    /// - `Err(PagewiseError::Retrieval)`: Document could not be retrieved
    async fn fetch_bytes(&self, document_id: &DocumentId) -> Result<DocumentHandle>;

    /// Extracts the text of one page (1-indexed) from a loaded document.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: Page text (possibly empty)
    /// - `Err(PagewiseError::Retrieval)`: Page missing or extraction failed
    async fn fetch_page_text(&self, handle: &DocumentHandle, page: u32) -> Result<String>;
}
