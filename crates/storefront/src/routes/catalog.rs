//! Catalog API route handlers.
//!
//! JSON proxies over the commerce backend. Listing and category responses
//! carry catalog entitlement flags for the visitor's selected account.

use axum::{
    Json,
    extract::{Path, Query, RawQuery, State},
};
use eecol_core::{Category, CategorySummary, CategoryUid, Product, ProductList, RecordData};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use url::form_urlencoded;

use crate::content::Placeholders;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Category summary with the visitor's entitlement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    #[serde(flatten)]
    pub category: CategorySummary,
    pub in_catalog: bool,
}

/// Products of a category with one entitlement flag per product.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsResponse {
    #[serde(flatten)]
    pub list: ProductList,
    pub in_catalog: Vec<bool>,
}

/// Customer/product triple for inventory and pricing lookups.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordQuery {
    pub customer_id: String,
    pub product_id: String,
    pub product_line: String,
}

/// Root categories with their subtrees.
///
/// GET /api/categories
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.categories().categories().await?))
}

/// One category by URL key.
///
/// GET /api/categories/{url_key}
#[instrument(skip(state, session))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    Path(url_key): Path<String>,
) -> Result<Json<CategoryResponse>> {
    let category = state
        .categories()
        .by_key(&url_key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {url_key}")))?;

    let in_catalog = match state.account_session(session).get_selected_account().await? {
        Some(account) => account
            .check_categories_in_catalog(&[category.name.as_str()])
            .first()
            .copied()
            .unwrap_or(true),
        None => true,
    };

    Ok(Json(CategoryResponse {
        category,
        in_catalog,
    }))
}

/// Products of a category, narrowed by any other query parameters.
///
/// GET /api/products?category={uid}&{filters}
#[instrument(skip(state, session))]
pub async fn products(
    State(state): State<AppState>,
    session: Session,
    RawQuery(query): RawQuery,
) -> Result<Json<ProductsResponse>> {
    let (category, filters) = split_category(query.as_deref().unwrap_or_default());
    let list = state
        .lookup()
        .lookup_category(category.as_ref(), filters.as_deref())
        .await?;

    let in_catalog = match state.account_session(session).get_selected_account().await? {
        Some(account) => {
            let tree = state.categories().tree().await?;
            account.check_products_in_catalog(&list.data, tree.index())
        }
        None => vec![true; list.data.len()],
    };

    Ok(Json(ProductsResponse { list, in_catalog }))
}

/// One product by sku.
///
/// GET /api/products/{sku}
#[instrument(skip(state))]
pub async fn product(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<Json<Product>> {
    state
        .lookup()
        .lookup_product(&sku)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {sku}")))
}

/// Customer specific inventory. `null` when the triple is incomplete.
///
/// GET /api/inventory?customerId&productId&productLine
#[instrument(skip(state))]
pub async fn inventory(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> Result<Json<Option<RecordData>>> {
    let record = state
        .lookup()
        .lookup_product_inventory(&query.customer_id, &query.product_id, &query.product_line)
        .await?;
    Ok(Json(record))
}

/// Customer specific pricing. `null` when the triple is incomplete.
///
/// GET /api/pricing?customerId&productId&productLine
#[instrument(skip(state))]
pub async fn pricing(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> Result<Json<Option<RecordData>>> {
    let record = state
        .lookup()
        .lookup_product_pricing(&query.customer_id, &query.product_id, &query.product_line)
        .await?;
    Ok(Json(record))
}

/// Site placeholders for the configured locale.
///
/// GET /api/placeholders
#[instrument(skip(state))]
pub async fn placeholders(State(state): State<AppState>) -> Result<Json<Placeholders>> {
    let prefix = &state.config().decoration.placeholders_prefix;
    let placeholders = state.content().placeholders(prefix).await?;
    Ok(Json(Placeholders::clone(&placeholders)))
}

/// Split the `category` parameter from the facet filters.
///
/// Filter segments are passed on exactly as received, flags without a value
/// included.
fn split_category(query: &str) -> (Option<CategoryUid>, Option<String>) {
    let mut category = None;
    let mut filters: Vec<&str> = Vec::new();

    for segment in query.split('&').filter(|s| !s.is_empty()) {
        match form_urlencoded::parse(segment.as_bytes()).next() {
            Some((key, value)) if key == "category" => {
                if category.is_none() {
                    category = Some(CategoryUid::new(value.into_owned()));
                }
            }
            _ => filters.push(segment),
        }
    }

    (category, (!filters.is_empty()).then(|| filters.join("&")))
}
