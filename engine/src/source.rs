use std::path::PathBuf;

use eramap_shared::{AtlasMeta, EmblemPosition, FeatureCollection};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::config::{
    EMBLEM_POSITIONS_FILE, META_FILE, upstream_connect_timeout, upstream_http_timeout,
};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("malformed data in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Provider of the atlas's static inputs: the meta table, per-civilisation
/// feature collections, the emblem position table, and raw icon artwork.
#[allow(async_fn_in_trait)]
pub trait AtlasSource: Send + Sync {
    async fn load_meta(&self) -> Result<AtlasMeta, SourceError>;
    async fn load_features(&self, file: &str) -> Result<FeatureCollection, SourceError>;
    async fn load_emblem_positions(&self) -> Result<Vec<EmblemPosition>, SourceError>;
    /// Raw SVG artwork for an icon, by the path recorded in the symbol table.
    async fn load_artwork(&self, path: &str) -> Result<String, SourceError>;
}

/// Atlas data rooted in a local directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, SourceError> {
        let path = self.root.join(file);
        let bytes = tokio::fs::read(&path).await.map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Json {
            path: path.display().to_string(),
            source,
        })
    }
}

impl AtlasSource for FsSource {
    async fn load_meta(&self) -> Result<AtlasMeta, SourceError> {
        self.read_json(META_FILE).await
    }

    async fn load_features(&self, file: &str) -> Result<FeatureCollection, SourceError> {
        self.read_json(file).await
    }

    async fn load_emblem_positions(&self) -> Result<Vec<EmblemPosition>, SourceError> {
        self.read_json(EMBLEM_POSITIONS_FILE).await
    }

    async fn load_artwork(&self, path: &str) -> Result<String, SourceError> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|source| SourceError::Io {
                path: full.display().to_string(),
                source,
            })
    }
}

/// Atlas data served from an HTTP base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("eramap/0.1")
            .timeout(upstream_http_timeout())
            .connect_timeout(upstream_connect_timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build configured HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        let url = self.url_for(path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| SourceError::Http {
                url: url.clone(),
                source,
            })?;
        resp.text().await.map_err(|source| SourceError::Http { url, source })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let text = self.fetch_text(path).await?;
        serde_json::from_str(&text).map_err(|source| SourceError::Json {
            path: self.url_for(path),
            source,
        })
    }
}

impl AtlasSource for HttpSource {
    async fn load_meta(&self) -> Result<AtlasMeta, SourceError> {
        self.fetch_json(META_FILE).await
    }

    async fn load_features(&self, file: &str) -> Result<FeatureCollection, SourceError> {
        self.fetch_json(file).await
    }

    async fn load_emblem_positions(&self) -> Result<Vec<EmblemPosition>, SourceError> {
        self.fetch_json(EMBLEM_POSITIONS_FILE).await
    }

    async fn load_artwork(&self, path: &str) -> Result<String, SourceError> {
        self.fetch_text(path).await
    }
}
