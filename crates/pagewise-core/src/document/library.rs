//! Document library trait.

use super::model::DocumentId;
use crate::error::Result;
use async_trait::async_trait;

/// Listing and deletion of stored documents.
#[async_trait]
pub trait DocumentLibrary: Send + Sync {
    /// Lists all stored documents.
    async fn list(&self) -> Result<Vec<DocumentId>>;

    /// Deletes a document and its progress record.
    ///
    /// Returns the server's confirmation message.
    async fn delete(&self, document_id: &DocumentId) -> Result<String>;

    /// Deletes every document and progress record.
    async fn delete_all(&self) -> Result<String>;
}
