//! On-disk cache for downloaded document bytes.
//!
//! Opt-in layer in front of another `DocumentSource`. Reading sessions do not
//! know it exists. Cache problems never fail a fetch: a broken read falls back
//! to the inner source and a failed write is only logged.

use crate::http_document_source::inspect;
use async_trait::async_trait;
use pagewise_core::document::{DocumentHandle, DocumentId, DocumentSource};
use pagewise_core::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const ENTRY_EXTENSION: &str = "bin";

pub struct CachedDocumentSource {
    inner: Arc<dyn DocumentSource>,
    dir: PathBuf,
}

impl CachedDocumentSource {
    pub fn new(inner: Arc<dyn DocumentSource>, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cache entry for `document_id`.
    pub fn entry_path(&self, document_id: &DocumentId) -> PathBuf {
        self.dir.join(cache_file_name(document_id))
    }

    /// Drops the cached bytes for a document, if any.
    pub async fn evict(&self, document_id: &DocumentId) -> Result<()> {
        match tokio::fs::remove_file(self.entry_path(document_id)).await {
            Ok(()) => {
                tracing::debug!("[DocumentCache] Evicted '{}'", document_id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Drops every cached document. Only cache entries are removed; other
    /// files in a user-configured directory stay.
    pub async fn clear(&self) -> Result<()> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0usize;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_entry = path
                .extension()
                .is_some_and(|ext| ext == ENTRY_EXTENSION);
            if is_entry && entry.file_type().await?.is_file() {
                tokio::fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        tracing::debug!(
            "[DocumentCache] Cleared {} entries from {}",
            removed,
            self.dir.display()
        );
        Ok(())
    }

    async fn read_entry(&self, document_id: &DocumentId) -> Option<Vec<u8>> {
        let path = self.entry_path(document_id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("[DocumentCache] Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn write_entry(&self, document_id: &DocumentId, bytes: &[u8]) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write to a sibling tmp file, then rename over the entry
        let path = self.entry_path(document_id);
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await
    }
}

#[async_trait]
impl DocumentSource for CachedDocumentSource {
    async fn fetch_bytes(&self, document_id: &DocumentId) -> Result<DocumentHandle> {
        if let Some(bytes) = self.read_entry(document_id).await {
            tracing::debug!(
                "[DocumentCache] Hit for '{}' ({} bytes)",
                document_id,
                bytes.len()
            );
            return inspect(document_id, bytes).await;
        }

        let handle = self.inner.fetch_bytes(document_id).await?;
        if let Err(e) = self.write_entry(document_id, handle.bytes()).await {
            tracing::warn!("[DocumentCache] Failed to store '{}': {}", document_id, e);
        }

        Ok(handle)
    }

    async fn fetch_page_text(&self, handle: &DocumentHandle, page: u32) -> Result<String> {
        self.inner.fetch_page_text(handle, page).await
    }
}

/// File name for a document id. Injective: `_` and every byte outside
/// `[A-Za-z0-9.-]` become `_xx` hex escapes, and a leading `.` is escaped too.
fn cache_file_name(document_id: &DocumentId) -> String {
    let mut name = String::with_capacity(document_id.as_str().len() + 4);
    for (idx, byte) in document_id.as_str().bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric() || byte == b'-' || (byte == b'.' && idx > 0);
        if keep {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("_{:02x}", byte));
        }
    }
    name.push('.');
    name.push_str(ENTRY_EXTENSION);
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_http_server::sample_pdf;
    use pagewise_core::error::PagewiseError;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mock source that counts downloads
    struct CountingSource {
        bytes: Vec<u8>,
        fetches: Mutex<u32>,
        fail: bool,
    }

    impl CountingSource {
        fn new(bytes: Vec<u8>) -> Self {
            Self {
                bytes,
                fetches: Mutex::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                bytes: Vec::new(),
                fetches: Mutex::new(0),
                fail: true,
            }
        }

        fn fetches(&self) -> u32 {
            *self.fetches.lock().unwrap()
        }
    }

    #[async_trait]
    impl DocumentSource for CountingSource {
        async fn fetch_bytes(&self, document_id: &DocumentId) -> Result<DocumentHandle> {
            *self.fetches.lock().unwrap() += 1;
            if self.fail {
                return Err(PagewiseError::retrieval("offline"));
            }
            Ok(DocumentHandle::new(document_id.clone(), self.bytes.clone()).with_page_count(2))
        }

        async fn fetch_page_text(&self, _handle: &DocumentHandle, page: u32) -> Result<String> {
            Ok(format!("page {page}"))
        }
    }

    #[test]
    fn test_cache_file_name_is_injective_and_flat() {
        let plain = cache_file_name(&DocumentId::new("report.pdf"));
        let nested = cache_file_name(&DocumentId::new("../etc/passwd"));
        let underscore = cache_file_name(&DocumentId::new("a_b"));
        let slash = cache_file_name(&DocumentId::new("a/b"));

        assert_eq!(plain, "report.pdf.bin");
        assert!(!nested.contains('/'));
        assert!(!nested.starts_with('.'));
        assert_ne!(underscore, slash);
    }

    #[tokio::test]
    async fn test_second_fetch_hits_disk() {
        let temp_dir = TempDir::new().unwrap();
        let inner = Arc::new(CountingSource::new(sample_pdf(&["one", "two"])));
        let cache = CachedDocumentSource::new(inner.clone(), temp_dir.path());
        let id = DocumentId::new("report.pdf");

        let first = cache.fetch_bytes(&id).await.unwrap();
        let second = cache.fetch_bytes(&id).await.unwrap();

        assert_eq!(inner.fetches(), 1);
        assert_eq!(first.bytes(), second.bytes());
        assert_eq!(second.page_count(), Some(2));
        assert!(cache.entry_path(&id).exists());
    }

    #[tokio::test]
    async fn test_evict_forces_refetch() {
        let temp_dir = TempDir::new().unwrap();
        let inner = Arc::new(CountingSource::new(sample_pdf(&["one"])));
        let cache = CachedDocumentSource::new(inner.clone(), temp_dir.path());
        let id = DocumentId::new("report.pdf");

        cache.fetch_bytes(&id).await.unwrap();
        cache.evict(&id).await.unwrap();
        cache.evict(&id).await.unwrap();
        cache.fetch_bytes(&id).await.unwrap();

        assert_eq!(inner.fetches(), 2);
    }

    #[tokio::test]
    async fn test_clear_drops_all_entries() {
        let temp_dir = TempDir::new().unwrap();
        let inner = Arc::new(CountingSource::new(sample_pdf(&["one"])));
        let cache = CachedDocumentSource::new(inner.clone(), temp_dir.path().join("documents"));
        let a = DocumentId::new("a.pdf");
        let b = DocumentId::new("b.pdf");

        let unrelated = temp_dir.path().join("documents").join("keep.txt");

        cache.fetch_bytes(&a).await.unwrap();
        cache.fetch_bytes(&b).await.unwrap();
        std::fs::write(&unrelated, b"mine").unwrap();
        cache.clear().await.unwrap();

        assert!(!cache.entry_path(&a).exists());
        assert!(!cache.entry_path(&b).exists());
        assert!(unrelated.exists());
        cache.fetch_bytes(&a).await.unwrap();
        assert_eq!(inner.fetches(), 3);
    }

    #[tokio::test]
    async fn test_clear_without_cache_dir() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CachedDocumentSource::new(
            Arc::new(CountingSource::new(Vec::new())),
            temp_dir.path().join("never-created"),
        );

        cache.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_inner_failure_propagates_and_caches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CachedDocumentSource::new(Arc::new(CountingSource::failing()), temp_dir.path());
        let id = DocumentId::new("report.pdf");

        let err = cache.fetch_bytes(&id).await.unwrap_err();

        assert!(err.is_retrieval());
        assert!(!cache.entry_path(&id).exists());
    }

    #[tokio::test]
    async fn test_page_text_delegates() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CachedDocumentSource::new(Arc::new(CountingSource::new(Vec::new())), temp_dir.path());
        let handle = DocumentHandle::new(DocumentId::new("x"), Vec::new());

        assert_eq!(cache.fetch_page_text(&handle, 3).await.unwrap(), "page 3");
    }
}
