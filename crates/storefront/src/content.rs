//! Authored content from the content origin.
//!
//! Pages are fetched as server-rendered semantic HTML and decorated by
//! [`crate::decoration`]. Site placeholders (translatable UI strings) come
//! from a `placeholders.json` sheet per locale prefix and are cached per
//! prefix for the lifetime of the process.

use std::collections::BTreeMap;
use std::sync::Arc;

use moka::future::Cache;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::decoration::to_camel_case;

/// Placeholder text keyed by camel-cased sheet key.
pub type Placeholders = BTreeMap<String, String>;

/// Errors that can occur when reading from the content origin.
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The origin answered with an unexpected status.
    #[error("{path} returned HTTP {status}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },

    /// Sheet did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A failed placeholder load shared with concurrent callers.
    #[error("{0}")]
    Shared(Arc<ContentError>),
}

#[derive(Debug, Deserialize)]
struct PlaceholderSheet {
    #[serde(default)]
    data: Vec<PlaceholderRow>,
}

#[derive(Debug, Deserialize)]
struct PlaceholderRow {
    #[serde(rename = "Key", default)]
    key: String,
    #[serde(rename = "Text", default)]
    text: String,
}

/// Client for the content origin.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    client: reqwest::Client,
    origin: Url,
    placeholders: Cache<String, Arc<Placeholders>>,
}

impl ContentClient {
    /// Create a new content client sharing `client`'s connection pool.
    #[must_use]
    pub fn new(client: reqwest::Client, origin: Url) -> Self {
        let placeholders = Cache::builder().max_capacity(32).build();

        Self {
            inner: Arc::new(ContentClientInner {
                client,
                origin,
                placeholders,
            }),
        }
    }

    /// Fetch the authored HTML for `path_and_query`.
    ///
    /// Returns `None` when the origin has no such page.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or any status other than
    /// success or 404.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, path_and_query: &str) -> Result<Option<String>, ContentError> {
        let url = self.url(path_and_query);
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ContentError::Status {
                path: path_and_query.to_string(),
                status,
            });
        }

        Ok(Some(response.text().await?))
    }

    /// Site placeholders for a locale prefix such as `/ca/en`.
    ///
    /// Loaded once per prefix; concurrent first callers share one request.
    ///
    /// # Errors
    ///
    /// Returns an error when the sheet cannot be fetched or decoded. Failed
    /// loads are not cached.
    pub async fn placeholders(&self, prefix: &str) -> Result<Arc<Placeholders>, ContentError> {
        let prefix = prefix.trim_end_matches('/').to_string();
        self.inner
            .placeholders
            .try_get_with(prefix.clone(), self.fetch_placeholders(prefix))
            .await
            .map_err(ContentError::Shared)
    }

    #[instrument(skip(self))]
    async fn fetch_placeholders(&self, prefix: String) -> Result<Arc<Placeholders>, ContentError> {
        let path = format!("{prefix}/placeholders.json");
        let response = self.inner.client.get(self.url(&path)).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ContentError::Status { path, status });
        }

        let body = response.text().await?;
        let placeholders = parse_placeholders(&body)?;
        debug!(count = placeholders.len(), "Loaded placeholders");
        Ok(Arc::new(placeholders))
    }

    fn url(&self, path_and_query: &str) -> Url {
        let (path, query) = path_and_query
            .split_once('?')
            .map_or((path_and_query, None), |(p, q)| (p, Some(q)));

        let mut url = self.inner.origin.clone();
        url.set_path(path);
        url.set_query(query.filter(|q| !q.is_empty()));
        url
    }
}

/// Decode a placeholders sheet, dropping rows without a key.
fn parse_placeholders(body: &str) -> Result<Placeholders, serde_json::Error> {
    let sheet: PlaceholderSheet = serde_json::from_str(body)?;
    Ok(sheet
        .data
        .into_iter()
        .filter(|row| !row.key.trim().is_empty())
        .map(|row| (to_camel_case(&row.key), row.text))
        .collect())
}
