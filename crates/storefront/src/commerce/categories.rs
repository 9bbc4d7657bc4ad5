//! Category taxonomy client.
//!
//! The taxonomy endpoint is a GraphQL gateway that only accepts GET, so the
//! query travels in the URL next to the API key. The response is decoded as a
//! standard GraphQL envelope; the storefront roots are the children of the
//! first returned item (the catalog root).

use std::sync::Arc;

use eecol_core::Category;
use graphql_client::Response;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::cache::CategorySource;
use super::{CommerceError, GraphQLError, excerpt};
use crate::config::CommerceConfig;

/// Categories query, four levels below the catalog root.
pub const CATEGORIES_QUERY: &str = "{
  categories {
    total_count
    items {
      uid
      level
      url_key
      url_path
      name
      path
      children_count
      children {
        uid
        level
        name
        url_key
        url_path
        path
        children_count
        path_in_store
        children {
          uid
          level
          name
          path
          url_key
          url_path
          children {
            uid
            level
            name
            path
            url_key
            url_path
          }
        }
      }
    }
    page_info {
      current_page
      page_size
      total_pages
    }
  }
}";

#[derive(Debug, Deserialize)]
struct CategoriesData {
    categories: Option<CategoryResult>,
}

#[derive(Debug, Deserialize)]
struct CategoryResult {
    #[serde(default)]
    items: Vec<CatalogRoot>,
}

/// The catalog root itself has no URL key, only its children matter.
#[derive(Debug, Deserialize)]
struct CatalogRoot {
    #[serde(default)]
    children: Option<Vec<Category>>,
}

/// Client for the category taxonomy endpoint.
#[derive(Clone)]
pub struct CategoryClient {
    inner: Arc<CategoryClientInner>,
}

struct CategoryClientInner {
    client: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
}

impl CategoryClient {
    /// Create a new taxonomy client sharing `client`'s connection pool.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &CommerceConfig) -> Self {
        Self {
            inner: Arc::new(CategoryClientInner {
                client,
                endpoint: config.graphql_endpoint.clone(),
                api_key: config.graphql_api_key.clone(),
            }),
        }
    }

    /// Fetch the storefront's root categories with their subtrees.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, GraphQL
    /// errors, an undecodable body, or a response without a catalog root.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, CommerceError> {
        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("api_key", self.inner.api_key.expose_secret())
            .append_pair("query", CATEGORIES_QUERY);

        let response = self
            .inner
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&body),
                "Category endpoint returned non-success status"
            );
            return Err(CommerceError::Status {
                endpoint: self.inner.endpoint.path().to_string(),
                status,
            });
        }

        let roots = parse_categories_response(&body)?;
        debug!(roots = roots.len(), "Fetched category taxonomy");
        Ok(roots)
    }
}

impl CategorySource for CategoryClient {
    async fn fetch_categories(&self) -> Result<Vec<Category>, CommerceError> {
        Self::fetch_categories(self).await
    }
}

/// Decode a taxonomy response body into the storefront root categories.
fn parse_categories_response(body: &str) -> Result<Vec<Category>, CommerceError> {
    let response: Response<CategoriesData> = serde_json::from_str(body).inspect_err(|e| {
        tracing::error!(
            error = %e,
            body = %excerpt(body),
            "Failed to decode category response"
        );
    })?;

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        return Err(CommerceError::GraphQL(
            errors.into_iter().map(GraphQLError::from).collect(),
        ));
    }

    response
        .data
        .and_then(|data| data.categories)
        .and_then(|result| result.items.into_iter().next())
        .ok_or(CommerceError::MissingData("categories.items[0]"))
        .map(|root| root.children.unwrap_or_default())
}
