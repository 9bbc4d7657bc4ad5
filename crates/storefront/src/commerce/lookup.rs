//! Product, inventory and pricing lookups.
//!
//! Each operation is a single GET against the lookup origin. Inputs that
//! cannot produce a meaningful request (no category, blank sku, incomplete
//! customer/product triple) short-circuit to an empty result without a
//! network call.

use std::sync::Arc;

use eecol_core::{CategoryUid, LookupEnvelope, Product, ProductList, RecordData};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;
use url::form_urlencoded::byte_serialize;

use super::{CommerceError, excerpt};
use crate::config::CommerceConfig;

/// Client for the product lookup service.
#[derive(Clone)]
pub struct LookupClient {
    inner: Arc<LookupClientInner>,
}

struct LookupClientInner {
    client: reqwest::Client,
    origin: Url,
    image_source_origin: Option<String>,
    image_query: String,
}

impl LookupClient {
    /// Create a new lookup client sharing `client`'s connection pool.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &CommerceConfig) -> Self {
        Self {
            inner: Arc::new(LookupClientInner {
                client,
                origin: config.lookup_origin.clone(),
                image_source_origin: config.image_source_origin.clone(),
                image_query: config.image_query.clone(),
            }),
        }
    }

    /// Products of a category, optionally narrowed by facet filters.
    ///
    /// `filters` is an already encoded query string (`brand=x&voltage=600`)
    /// appended verbatim. No category yields an empty list without a
    /// request; a non-200 answer also yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an undecodable 200 body.
    #[instrument(skip(self))]
    pub async fn lookup_category(
        &self,
        category: Option<&CategoryUid>,
        filters: Option<&str>,
    ) -> Result<ProductList, CommerceError> {
        let Some(uid) = category.filter(|uid| !uid.is_empty()) else {
            return Ok(ProductList::empty());
        };

        let mut query = format!("category={}", encode(uid.as_str()));
        if let Some(filters) = filters.map(|f| f.trim_start_matches(['?', '&'])).filter(|f| !f.is_empty()) {
            query.push('&');
            query.push_str(filters);
        }

        let url = self.endpoint("/productLookup", &query);
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status != reqwest::StatusCode::OK {
            warn!(status = %status, "Category lookup returned no products");
            return Ok(ProductList::empty());
        }

        let body = response.text().await?;
        let mut products: ProductList = decode(&body)?;
        for product in &mut products.data {
            self.rewrite_image(product);
        }

        debug!(count = products.data.len(), "Category lookup complete");
        Ok(products)
    }

    /// A single product by sku.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self))]
    pub async fn lookup_product(&self, sku: &str) -> Result<Option<Product>, CommerceError> {
        if sku.trim().is_empty() {
            return Ok(None);
        }

        let query = format!("sku={}", encode(sku));
        let envelope: LookupEnvelope<Vec<Product>> =
            self.get_json("/productLookup", &query).await?;

        Ok(envelope.data.into_iter().next().map(|mut product| {
            self.rewrite_image(&mut product);
            product
        }))
    }

    /// Customer specific inventory for a product.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self))]
    pub async fn lookup_product_inventory(
        &self,
        customer_id: &str,
        product_id: &str,
        product_line: &str,
    ) -> Result<Option<RecordData>, CommerceError> {
        self.lookup_record("/inventory", customer_id, product_id, product_line)
            .await
    }

    /// Customer specific pricing for a product.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self))]
    pub async fn lookup_product_pricing(
        &self,
        customer_id: &str,
        product_id: &str,
        product_line: &str,
    ) -> Result<Option<RecordData>, CommerceError> {
        self.lookup_record("/pricing", customer_id, product_id, product_line)
            .await
    }

    async fn lookup_record(
        &self,
        path: &str,
        customer_id: &str,
        product_id: &str,
        product_line: &str,
    ) -> Result<Option<RecordData>, CommerceError> {
        if [customer_id, product_id, product_line]
            .iter()
            .any(|v| v.trim().is_empty())
        {
            return Ok(None);
        }

        let query = format!(
            "customerId={}&productId={}&productLine={}",
            encode(customer_id),
            encode(product_id),
            encode(product_line)
        );
        let envelope: LookupEnvelope<RecordData> = self.get_json(path, &query).await?;
        Ok(Some(envelope.data))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
    ) -> Result<T, CommerceError> {
        let url = self.endpoint(path, query);
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path,
                body = %excerpt(&body),
                "Lookup service returned non-success status"
            );
            return Err(CommerceError::Status {
                endpoint: path.to_string(),
                status,
            });
        }

        decode(&body)
    }

    fn endpoint(&self, path: &str, query: &str) -> Url {
        let mut url = self.inner.origin.clone();
        url.set_path(path);
        url.set_query(Some(query));
        url
    }

    fn rewrite_image(&self, product: &mut Product) {
        if let Some(image) = product.image.as_deref() {
            product.image = Some(rewrite_image_url(
                image,
                self.inner.image_source_origin.as_deref(),
                self.inner.origin.as_str(),
                &self.inner.image_query,
            ));
        }
    }
}

/// Point a product image at the delivery origin and add the optimisation query.
///
/// Only images under `source_origin` are moved; the query is appended to every
/// image. A host that merely shares the origin as a text prefix is not under it.
#[must_use]
pub fn rewrite_image_url(
    image: &str,
    source_origin: Option<&str>,
    target_origin: &str,
    query: &str,
) -> String {
    let mut url = match source_origin
        .filter(|s| !s.is_empty())
        .and_then(|source| path_under(image, source))
    {
        Some(rest) => format!(
            "{}/{}",
            target_origin.trim_end_matches('/'),
            rest.trim_start_matches('/')
        ),
        None => image.to_string(),
    };

    let query = query.trim_start_matches('?');
    if !query.is_empty() {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(query);
    }
    url
}

/// The part of `image` after `source`, when `image` lies under it.
fn path_under<'a>(image: &'a str, source: &str) -> Option<&'a str> {
    let rest = image.strip_prefix(source)?;
    let at_boundary = source.ends_with('/')
        || rest.is_empty()
        || rest.starts_with(['/', '?', '#']);
    at_boundary.then_some(rest)
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CommerceError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %excerpt(body),
            "Failed to decode lookup response"
        );
        CommerceError::Decode(e)
    })
}
