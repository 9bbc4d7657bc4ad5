//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the category tree
//! eecol-cli categories
//!
//! # Products of a category, with facet filters
//! eecol-cli lookup category Mw== --filters "brand=3M"
//!
//! # Customer pricing
//! eecol-cli lookup pricing 1001 123456 SWR
//! ```

use eecol_core::{Category, CategoryUid, text::title_case};
use eecol_storefront::state::AppState;
use serde::Serialize;
use tracing::info;

/// Print the category tree, or the raw taxonomy with `json`.
///
/// # Errors
///
/// Returns an error if the taxonomy cannot be fetched.
pub async fn categories(state: &AppState, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tree = state.categories().tree().await?;
    info!(categories = tree.len(), "Fetched category taxonomy");

    if json {
        print_json(&tree.roots())?;
    } else {
        print_tree(tree.roots(), 0);
    }
    Ok(())
}

/// Print one category summary by URL key.
///
/// # Errors
///
/// Returns an error if the taxonomy cannot be fetched or the key is unknown.
pub async fn category(state: &AppState, url_key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let summary = state
        .categories()
        .by_key(url_key)
        .await?
        .ok_or_else(|| format!("Unknown category: {url_key}"))?;
    print_json(&summary)
}

/// Print the products of a category.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub async fn lookup_category(
    state: &AppState,
    uid: &str,
    filters: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let uid = CategoryUid::new(uid);
    let products = state.lookup().lookup_category(Some(&uid), filters).await?;
    info!(count = products.data.len(), "Category lookup complete");
    print_json(&products)
}

/// Print one product.
///
/// # Errors
///
/// Returns an error if the lookup fails or the sku is unknown.
pub async fn lookup_product(state: &AppState, sku: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = state
        .lookup()
        .lookup_product(sku)
        .await?
        .ok_or_else(|| format!("Unknown product: {sku}"))?;
    print_json(&product)
}

/// Print a customer's inventory record for a product.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub async fn lookup_inventory(
    state: &AppState,
    customer_id: &str,
    product_id: &str,
    product_line: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = state
        .lookup()
        .lookup_product_inventory(customer_id, product_id, product_line)
        .await?;
    print_json(&record)
}

/// Print a customer's pricing record, with the price formatted when present.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub async fn lookup_pricing(
    state: &AppState,
    customer_id: &str,
    product_id: &str,
    product_line: &str,
    currency: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = state
        .lookup()
        .lookup_product_pricing(customer_id, product_id, product_line)
        .await?;

    if let Some(formatted) = record
        .as_ref()
        .and_then(|r| r.get("price"))
        .and_then(|price| super::price::format_value(price, currency).ok())
    {
        info!(price = %formatted, "Customer price");
    }
    print_json(&record)
}

#[allow(clippy::print_stdout)]
fn print_tree(categories: &[Category], depth: usize) {
    for category in categories {
        println!(
            "{:indent$}{} ({}, {})",
            "",
            title_case(&category.name),
            category.url_key,
            category.uid,
            indent = depth * 2
        );
        print_tree(&category.children, depth + 1);
    }
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
