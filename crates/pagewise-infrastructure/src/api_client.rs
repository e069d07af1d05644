//! Shared HTTP plumbing for the file API.
//!
//! All endpoints live under `{base_url}/api/files`. Document ids are appended
//! as single percent-encoded path segments so names with spaces or slashes
//! stay intact.

use pagewise_core::config::ClientConfig;
use pagewise_core::document::DocumentId;
use pagewise_core::error::{PagewiseError, Result};
use reqwest::{Client, Url};
use std::time::Duration;

const FILES_PATH: [&str; 2] = ["api", "files"];

/// reqwest client bound to one server.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PagewiseError::config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PagewiseError::config(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PagewiseError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/files/download/{id}`
    pub fn download_url(&self, document_id: &DocumentId) -> Result<Url> {
        self.files_url(&["download", document_id.as_str()])
    }

    /// `GET|POST /api/files/progress/{id}`
    pub fn progress_url(&self, document_id: &DocumentId) -> Result<Url> {
        self.files_url(&["progress", document_id.as_str()])
    }

    /// `GET /api/files`
    pub fn list_url(&self) -> Result<Url> {
        self.files_url(&[])
    }

    /// `DELETE /api/files/delete/{id}`
    pub fn delete_url(&self, document_id: &DocumentId) -> Result<Url> {
        self.files_url(&["delete", document_id.as_str()])
    }

    /// `DELETE /api/files/delete-all`
    pub fn delete_all_url(&self) -> Result<Url> {
        self.files_url(&["delete-all"])
    }

    fn files_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| PagewiseError::config(format!("Base URL '{}' cannot carry a path", self.base_url)))?;
            path.pop_if_empty();
            path.extend(FILES_PATH);
            path.extend(segments);
        }
        Ok(url)
    }
}

/// Turns a non-2xx response into an error message that includes the status.
pub(crate) async fn ensure_success(response: reqwest::Response) -> std::result::Result<reqwest::Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if body.trim().is_empty() {
        Err(format!("server returned {}", status))
    } else {
        Err(format!("server returned {}: {}", status, body.trim()))
    }
}
