//! Document identity and loaded-document handle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque name of a stored document (the file name on the server).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Loaded document bytes, owned by a reading session.
///
/// Cloning is cheap; the bytes are shared.
#[derive(Clone)]
pub struct DocumentHandle {
    id: DocumentId,
    bytes: Arc<[u8]>,
    page_count: Option<u32>,
}

impl DocumentHandle {
    /// Creates a handle whose page count is not known yet.
    pub fn new(id: DocumentId, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id,
            bytes: bytes.into(),
            page_count: None,
        }
    }

    /// Records the page count discovered while loading the bytes.
    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = Some(page_count);
        self
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Page count, if the adapter could determine it at load time.
    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }
}

impl fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("id", &self.id)
            .field("len", &self.bytes.len())
            .field("page_count", &self.page_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_debug_omits_bytes() {
        let handle = DocumentHandle::new(DocumentId::new("a.pdf"), vec![1u8, 2, 3]).with_page_count(4);
        let rendered = format!("{handle:?}");

        assert!(rendered.contains("len: 3"));
        assert!(rendered.contains("page_count: Some(4)"));
        assert_eq!(handle.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_document_id_serializes_as_string() {
        let id = DocumentId::new("report.pdf");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"report.pdf\"");
    }
}
