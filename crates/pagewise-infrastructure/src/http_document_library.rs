//! HttpDocumentLibrary - listing and deleting stored documents.

use crate::api_client::{ApiClient, ensure_success};
use async_trait::async_trait;
use pagewise_core::document::{DocumentId, DocumentLibrary};
use pagewise_core::error::{PagewiseError, Result};

#[derive(Clone, Debug)]
pub struct HttpDocumentLibrary {
    api: ApiClient,
}

impl HttpDocumentLibrary {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn send_delete(&self, url: reqwest::Url) -> Result<String> {
        tracing::debug!("[HttpDocumentLibrary] DELETE {}", url);

        let response = self
            .api
            .client()
            .delete(url)
            .send()
            .await
            .map_err(|e| PagewiseError::retrieval(e.to_string()))?;
        let response = ensure_success(response).await.map_err(PagewiseError::retrieval)?;

        response
            .text()
            .await
            .map_err(|e| PagewiseError::retrieval(e.to_string()))
    }
}

#[async_trait]
impl DocumentLibrary for HttpDocumentLibrary {
    async fn list(&self) -> Result<Vec<DocumentId>> {
        let url = self.api.list_url()?;
        tracing::debug!("[HttpDocumentLibrary] GET {}", url);

        let response = self
            .api
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| PagewiseError::retrieval(e.to_string()))?;
        let response = ensure_success(response).await.map_err(PagewiseError::retrieval)?;

        let body = response
            .bytes()
            .await
            .map_err(|e| PagewiseError::retrieval(e.to_string()))?;
        let mut documents: Vec<DocumentId> = serde_json::from_slice(&body)?;
        documents.sort();

        Ok(documents)
    }

    async fn delete(&self, document_id: &DocumentId) -> Result<String> {
        let url = self.api.delete_url(document_id)?;
        self.send_delete(url).await
    }

    async fn delete_all(&self) -> Result<String> {
        let url = self.api.delete_all_url()?;
        self.send_delete(url).await
    }
}
