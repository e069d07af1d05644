//! Progress store trait.

use crate::document::DocumentId;
use crate::error::Result;
use async_trait::async_trait;

/// Position reported for documents that have no progress record yet.
pub const FIRST_PAGE: u32 = 1;

/// Remote store of the last page a reader reached, per document.
///
/// Both operations fail with `PagewiseError::StoreUnavailable`. Concurrent
/// `set` calls are not ordered; the store keeps whichever it applies last.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Reads the stored position for a document.
    async fn get(&self, document_id: &DocumentId) -> Result<u32>;

    /// Stores a new position for a document.
    async fn set(&self, document_id: &DocumentId, position: u32) -> Result<()>;
}

/// Maps a raw remote value onto a valid 1-indexed page position.
pub fn normalize_position(raw: i64) -> u32 {
    if raw < i64::from(FIRST_PAGE) {
        FIRST_PAGE
    } else {
        u32::try_from(raw).unwrap_or(u32::MAX)
    }
}
