//! HttpDocumentSource - document bytes over the file API, page text via lopdf.

use crate::api_client::{ApiClient, ensure_success};
use crate::pdf_text::ParsedPdf;
use async_trait::async_trait;
use pagewise_core::document::{DocumentHandle, DocumentId, DocumentSource};
use pagewise_core::error::{PagewiseError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The most recently parsed document and the handle it was parsed from.
type ParsedSlot = Option<(DocumentHandle, Arc<ParsedPdf>)>;

/// Document source backed by `/api/files/download/{id}`.
///
/// Keeps the last parsed document, so a reading session pays for one parse
/// per opened document instead of one per extracted page.
#[derive(Clone, Debug)]
pub struct HttpDocumentSource {
    api: ApiClient,
    parsed: Arc<Mutex<ParsedSlot>>,
}

impl HttpDocumentSource {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            parsed: Arc::new(Mutex::new(None)),
        }
    }

    /// Downloads the raw payload without inspecting it.
    pub async fn download(&self, document_id: &DocumentId) -> Result<Vec<u8>> {
        let url = self.api.download_url(document_id)?;
        tracing::debug!("[HttpDocumentSource] GET {}", url);

        let response = self
            .api
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| PagewiseError::retrieval(e.to_string()))?;
        let response = ensure_success(response).await.map_err(PagewiseError::retrieval)?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PagewiseError::retrieval(e.to_string()))?;

        tracing::info!(
            "[HttpDocumentSource] Downloaded '{}' ({} bytes)",
            document_id,
            bytes.len()
        );
        Ok(bytes.to_vec())
    }

    /// Parsed form of `handle`, reusing the last parse when it came from the
    /// same bytes.
    async fn parsed(&self, handle: &DocumentHandle) -> Result<Arc<ParsedPdf>> {
        let mut slot = self.parsed.lock().await;
        if let Some((cached, parsed)) = slot.as_ref() {
            if same_document(cached, handle) {
                return Ok(parsed.clone());
            }
        }

        let parsed = parse(handle.clone()).await?;
        *slot = Some((handle.clone(), parsed.clone()));
        Ok(parsed)
    }
}

/// Same id and the same shared byte buffer. The slot holds a clone of the
/// handle, so the buffer cannot be freed and its address reused meanwhile.
fn same_document(a: &DocumentHandle, b: &DocumentHandle) -> bool {
    a.id() == b.id() && std::ptr::eq(a.bytes(), b.bytes())
}

async fn parse(handle: DocumentHandle) -> Result<Arc<ParsedPdf>> {
    tokio::task::spawn_blocking(move || ParsedPdf::parse(handle.bytes()).map(Arc::new))
        .await
        .map_err(|e| PagewiseError::retrieval(format!("PDF parse task failed: {}", e)))?
}

/// Builds a handle and parses it, attaching the page count when the bytes
/// parse as a PDF.
///
/// A parse failure is not fatal here: the renderer may still report a page
/// count later.
async fn parse_handle(
    document_id: &DocumentId,
    bytes: Vec<u8>,
) -> (DocumentHandle, Option<Arc<ParsedPdf>>) {
    let handle = DocumentHandle::new(document_id.clone(), bytes);

    let counted = parse(handle.clone())
        .await
        .and_then(|parsed| Ok((parsed.page_count()?, parsed)));

    match counted {
        Ok((count, parsed)) => (handle.with_page_count(count), Some(parsed)),
        Err(e) => {
            tracing::warn!(
                "[HttpDocumentSource] Could not determine page count for '{}': {}",
                document_id,
                e
            );
            (handle, None)
        }
    }
}

/// Builds a handle, attaching the page count when the bytes parse as a PDF.
pub(crate) async fn inspect(document_id: &DocumentId, bytes: Vec<u8>) -> Result<DocumentHandle> {
    Ok(parse_handle(document_id, bytes).await.0)
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch_bytes(&self, document_id: &DocumentId) -> Result<DocumentHandle> {
        let bytes = self.download(document_id).await?;
        let (handle, parsed) = parse_handle(document_id, bytes).await;
        if let Some(parsed) = parsed {
            *self.parsed.lock().await = Some((handle.clone(), parsed));
        }
        Ok(handle)
    }

    async fn fetch_page_text(&self, handle: &DocumentHandle, page: u32) -> Result<String> {
        let parsed = self.parsed(handle).await?;
        tokio::task::spawn_blocking(move || parsed.page_text(page))
            .await
            .map_err(|e| PagewiseError::retrieval(format!("extraction task failed: {}", e)))?
    }
}
