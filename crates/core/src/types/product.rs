//! Product lookup records.
//!
//! The lookup service owns the product shape; the storefront only relies on
//! `sku`, `image` and `categories` and passes everything else through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::Sku;

/// A product as returned by the lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    /// Absolute image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Uids of the categories the product belongs to.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Every other attribute, untouched.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Products for one category lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub data: Vec<Product>,
    /// Paging and facet metadata, untouched.
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl ProductList {
    /// An empty result, used when there is nothing to look up.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Inventory and pricing payloads are customer specific and opaque here.
pub type RecordData = Map<String, Value>;

/// The `{ "data": ... }` envelope every lookup endpoint answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupEnvelope<T> {
    pub data: T,
}
