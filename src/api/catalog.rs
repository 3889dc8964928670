use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url, header};
use thiserror::Error;

use crate::config::{AppConfig, CatalogSource};
use crate::models::{Book, CatalogDocument};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("catalog request returned status {0}")]
    Status(StatusCode),
    #[error("unable to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(String),
}

/// Reads the catalog document from its configured source.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    source: CatalogSource,
}

impl CatalogClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "X-Session-Id",
            header::HeaderValue::from_str(config.session_id())
                .context("invalid session identifier header value")?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent())
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("unable to construct http client")?;

        Ok(Self {
            http,
            source: config.catalog_source().clone(),
        })
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub async fn fetch_books(&self) -> Result<Vec<Book>, CatalogError> {
        let document = match &self.source {
            CatalogSource::Http(url) => self.fetch_remote(url.clone()).await?,
            CatalogSource::File(path) => read_local(path).await?,
        };
        Ok(document.books)
    }

    async fn fetch_remote(&self, url: Url) -> Result<CatalogDocument, CatalogError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body = response.bytes().await?;
        parse_document(&body)
    }
}

async fn read_local(path: &Path) -> Result<CatalogDocument, CatalogError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_document(&bytes)
}

pub fn parse_document(bytes: &[u8]) -> Result<CatalogDocument, CatalogError> {
    serde_json::from_slice(bytes).map_err(|err| CatalogError::Parse(err.to_string()))
}
