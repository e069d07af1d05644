pub mod api_client;
pub mod cached_document_source;
pub mod config_service;
pub mod http_document_library;
pub mod http_document_source;
pub mod http_progress_store;
pub mod paths;
pub mod pdf_text;

#[cfg(test)]
mod test_http_server;

pub use crate::api_client::ApiClient;
pub use crate::cached_document_source::CachedDocumentSource;
pub use crate::config_service::ConfigService;
pub use crate::http_document_library::HttpDocumentLibrary;
pub use crate::http_document_source::HttpDocumentSource;
pub use crate::http_progress_store::HttpProgressStore;
pub use crate::paths::PagewisePaths;
