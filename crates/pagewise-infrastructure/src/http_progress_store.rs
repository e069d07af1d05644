//! HttpProgressStore - reading progress over the file API.

use crate::api_client::{ApiClient, ensure_success};
use async_trait::async_trait;
use pagewise_core::document::DocumentId;
use pagewise_core::error::{PagewiseError, Result};
use pagewise_core::progress::{FIRST_PAGE, ProgressStore, normalize_position};
use reqwest::StatusCode;

/// Progress store backed by `/api/files/progress/{id}`.
#[derive(Clone, Debug)]
pub struct HttpProgressStore {
    api: ApiClient,
}

impl HttpProgressStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ProgressStore for HttpProgressStore {
    async fn get(&self, document_id: &DocumentId) -> Result<u32> {
        let url = self.api.progress_url(document_id)?;
        tracing::debug!("[HttpProgressStore] GET {}", url);

        let response = self
            .api
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| PagewiseError::store_unavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(
                "[HttpProgressStore] No progress for '{}', starting at page {}",
                document_id,
                FIRST_PAGE
            );
            return Ok(FIRST_PAGE);
        }

        let response = ensure_success(response)
            .await
            .map_err(PagewiseError::store_unavailable)?;
        let body = response
            .text()
            .await
            .map_err(|e| PagewiseError::store_unavailable(e.to_string()))?;

        let raw: i64 = body.trim().parse().map_err(|_| {
            PagewiseError::store_unavailable(format!("unexpected progress payload: '{}'", body.trim()))
        })?;

        Ok(normalize_position(raw))
    }

    async fn set(&self, document_id: &DocumentId, position: u32) -> Result<()> {
        let url = self.api.progress_url(document_id)?;
        tracing::debug!("[HttpProgressStore] POST {} position={}", url, position);

        let response = self
            .api
            .client()
            .post(url)
            .query(&[("position", position)])
            .send()
            .await
            .map_err(|e| PagewiseError::store_unavailable(e.to_string()))?;

        ensure_success(response)
            .await
            .map_err(PagewiseError::store_unavailable)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_http_server::MockServer;

    #[tokio::test]
    async fn test_get_and_set_round_trip_through_server() {
        let server = MockServer::start().await;
        server.set_progress("report.pdf", 5);
        let store = HttpProgressStore::new(server.api());
        let id = DocumentId::new("report.pdf");

        assert_eq!(store.get(&id).await.unwrap(), 5);

        store.set(&id, 6).await.unwrap();
        assert_eq!(server.progress("report.pdf"), Some(6));
    }

    #[tokio::test]
    async fn test_unknown_document_starts_at_first_page() {
        let server = MockServer::start().await;
        let store = HttpProgressStore::new(server.api());

        assert_eq!(store.get(&DocumentId::new("fresh.pdf")).await.unwrap(), FIRST_PAGE);
    }

    #[tokio::test]
    async fn test_zero_progress_is_clamped() {
        let server = MockServer::start().await;
        server.set_progress("report.pdf", 0);
        let store = HttpProgressStore::new(server.api());

        assert_eq!(store.get(&DocumentId::new("report.pdf")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_store_unavailable() {
        let server = MockServer::start().await;
        server.set_progress_down(true);
        let store = HttpProgressStore::new(server.api());
        let id = DocumentId::new("report.pdf");

        let err = store.get(&id).await.unwrap_err();
        assert!(err.is_store_unavailable());
        assert!(err.to_string().contains("503"));

        assert!(store.set(&id, 2).await.unwrap_err().is_store_unavailable());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_store_unavailable() {
        let api = ApiClient::new("http://127.0.0.1:9", std::time::Duration::from_millis(500)).unwrap();
        let store = HttpProgressStore::new(api);

        let err = store.get(&DocumentId::new("report.pdf")).await.unwrap_err();
        assert!(err.is_store_unavailable());
    }
}
