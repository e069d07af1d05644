use anyhow::{Context, Result};
use pagewise_core::config::ClientConfig;
use pagewise_core::document::DocumentSource;
use pagewise_infrastructure::{
    ApiClient, CachedDocumentSource, ConfigService, HttpDocumentLibrary, HttpDocumentSource,
    HttpProgressStore, PagewisePaths,
};
use std::sync::Arc;
use std::time::Duration;

/// Command-line values that win over config file and environment.
pub struct Overrides {
    pub base_url: Option<String>,
    pub cache: bool,
}

/// Clients shared by every command.
pub struct Services {
    pub config: ClientConfig,
    pub library: HttpDocumentLibrary,
    pub progress: Arc<HttpProgressStore>,
    pub source: Arc<dyn DocumentSource>,
    pub cache: Option<Arc<CachedDocumentSource>>,
}

impl Services {
    pub fn build(overrides: Overrides) -> Result<Self> {
        let mut config = ConfigService::new()
            .load()
            .context("Failed to load configuration")?;
        if let Some(base_url) = overrides.base_url {
            config.base_url = base_url;
        }
        if overrides.cache {
            config.cache.enabled = true;
        }

        let api = ApiClient::from_config(&config)?;
        tracing::debug!("[Services] Using file server at {}", api.base_url());

        let http_source: Arc<dyn DocumentSource> = Arc::new(HttpDocumentSource::new(api.clone()));
        let cache = if config.cache.enabled {
            let dir = match &config.cache.dir {
                Some(dir) => dir.clone(),
                None => PagewisePaths::document_cache_dir()?,
            };
            tracing::debug!("[Services] Document cache at {}", dir.display());
            Some(Arc::new(CachedDocumentSource::new(http_source.clone(), dir)))
        } else {
            None
        };

        let source = match &cache {
            Some(cache) => cache.clone() as Arc<dyn DocumentSource>,
            None => http_source,
        };

        Ok(Self {
            library: HttpDocumentLibrary::new(api.clone()),
            progress: Arc::new(HttpProgressStore::new(api)),
            source,
            cache,
            config,
        })
    }

    /// Upper bound for waiting on background work before exit.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }
}
