//! Integration tests for the catalog API.
//!
//! Runs the storefront against the in-process mock upstream from the
//! harness; no external services required.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use eecol_integration_tests::{TestContext, session_account};
use reqwest::StatusCode;
use serde_json::{Value, json};

// =============================================================================
// Category Taxonomy
// =============================================================================

#[tokio::test]
async fn test_categories_tree() {
    let ctx = TestContext::start().await;

    let resp = ctx.get("/api/categories").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let roots: Value = resp.json().await.unwrap();
    let roots = roots.as_array().unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0]["url_key"], "wire-cable");
    assert_eq!(roots[0]["children_count"], 1);
    assert_eq!(roots[0]["children"][0]["url_key"], "building-wire");
    assert_eq!(roots[1]["name"], "Lighting");
}

#[tokio::test]
async fn test_taxonomy_fetched_once() {
    let ctx = TestContext::start().await;

    let (a, b, c) = tokio::join!(
        ctx.get("/api/categories"),
        ctx.get("/api/categories/wire-cable"),
        ctx.get("/api/categories/building-wire"),
    );
    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::OK);
    assert_eq!(c.status(), StatusCode::OK);

    ctx.get("/api/categories").await;
    assert_eq!(ctx.upstream.category_requests(), 1);
    assert!(ctx.state.categories().is_loaded());
}

#[tokio::test]
async fn test_category_by_key() {
    let ctx = TestContext::start().await;

    let body: Value = ctx
        .get("/api/categories/building-wire")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["uid"], "NQ==");
    assert_eq!(body["url_path"], "wire-cable/building-wire");
    assert_eq!(body["inCatalog"], true);
    assert!(body.get("children").is_none());
}

#[tokio::test]
async fn test_unknown_category_is_not_found() {
    let ctx = TestContext::start().await;
    let resp = ctx.get("/api/categories/no-such-thing").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_entitlement_follows_selected_account() {
    let ctx = TestContext::start().await;

    let resp = ctx.put_json("/api/account/session", &session_account()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = ctx
        .put_json("/api/account/selected", &json!({ "accountId": "1001" }))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let wire: Value = ctx.get("/api/categories/wire-cable").await.json().await.unwrap();
    assert_eq!(wire["inCatalog"], true);

    let lighting: Value = ctx.get("/api/categories/lighting").await.json().await.unwrap();
    assert_eq!(lighting["inCatalog"], false);
}

// =============================================================================
// Product Lookups
// =============================================================================

#[tokio::test]
async fn test_products_of_category() {
    let ctx = TestContext::start().await;

    let body: Value = ctx
        .get("/api/products?category=Mw%3D%3D")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["inCatalog"], json!([true, true]));

    let image = body["data"][0]["image"].as_str().unwrap();
    assert!(image.starts_with(ctx.upstream.url.as_str()));
    assert!(image.ends_with("/ABC-123.jpg?format=webply&optimize=medium"));
}

#[tokio::test]
async fn test_products_with_filters() {
    let ctx = TestContext::start().await;

    let body: Value = ctx
        .get("/api/products?category=Mw%3D%3D&brand=3M")
        .await
        .json()
        .await
        .unwrap();

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["sku"], "ABC-123");
}

#[tokio::test]
async fn test_products_without_category_is_empty() {
    let ctx = TestContext::start().await;

    let body: Value = ctx.get("/api/products").await.json().await.unwrap();
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["inCatalog"], json!([]));
}

#[tokio::test]
async fn test_products_of_unknown_category_is_empty() {
    let ctx = TestContext::start().await;

    let resp = ctx.get("/api/products?category=ZZ%3D%3D").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_product_entitlement_follows_selected_account() {
    let ctx = TestContext::start().await;

    ctx.put_json("/api/account/session", &session_account()).await;
    ctx.put_json("/api/account/selected", &json!({ "accountId": "1001" }))
        .await;

    let body: Value = ctx
        .get("/api/products?category=Mw%3D%3D")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["inCatalog"], json!([true, false]));
}

#[tokio::test]
async fn test_product_by_sku() {
    let ctx = TestContext::start().await;

    let body: Value = ctx.get("/api/products/ABC-123").await.json().await.unwrap();
    assert_eq!(body["sku"], "ABC-123");
    assert_eq!(body["name"], "Product ABC-123");

    let resp = ctx.get("/api/products/NOPE").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inventory_and_pricing() {
    let ctx = TestContext::start().await;
    let query = "customerId=1001&productId=123456&productLine=SWR";

    let inventory: Value = ctx
        .get(&format!("/api/inventory?{query}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(inventory["available"], 42);
    assert_eq!(inventory["productId"], "123456");

    let pricing: Value = ctx
        .get(&format!("/api/pricing?{query}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(pricing["price"], "19.5");
}

#[tokio::test]
async fn test_incomplete_record_query_is_null() {
    let ctx = TestContext::start().await;

    let body: Value = ctx
        .get("/api/inventory?customerId=1001&productId=123456")
        .await
        .json()
        .await
        .unwrap();
    assert!(body.is_null());
}

// =============================================================================
// Placeholders
// =============================================================================

#[tokio::test]
async fn test_placeholders_loaded_once() {
    let ctx = TestContext::start().await;

    let first: Value = ctx.get("/api/placeholders").await.json().await.unwrap();
    let second: Value = ctx.get("/api/placeholders").await.json().await.unwrap();

    assert_eq!(
        first,
        json!({ "addToCart": "Add to Cart", "searchProducts": "Search" })
    );
    assert_eq!(first, second);
    assert_eq!(ctx.upstream.placeholder_requests(), 1);
}
