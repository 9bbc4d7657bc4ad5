//! Integration tests for decorated content pages.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use eecol_integration_tests::TestContext;
use reqwest::StatusCode;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::start().await;

    let resp = ctx.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_home_page_gets_hero() {
    let ctx = TestContext::start().await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();

    assert!(html.contains(r#"data-block-name="hero""#));
    assert!(html.contains(r#"data-block-name="cards""#));
    assert!(html.contains(r#"data-block-name="header""#));
    assert!(html.contains(r#"data-lcp="true""#));
    assert!(html.contains(r#"loading="eager""#));
    assert!(html.contains(r#"data-section-status="initialized""#));
    assert!(html.contains(r#"import("/scripts/delayed.js")"#));
}

#[tokio::test]
async fn test_page_load_fetches_taxonomy() {
    let ctx = TestContext::start().await;

    ctx.get("/").await;
    ctx.get("/wire-cable").await;
    assert_eq!(ctx.upstream.category_requests(), 1);
}

#[tokio::test]
async fn test_category_page_replaces_main() {
    let ctx = TestContext::start().await;

    let html = ctx.get("/wire-cable").await.text().await.unwrap();

    assert!(html.contains(r#"data-block-name="breadcrumbs""#));
    assert!(html.contains(r#"data-block-name="category""#));
    assert!(!html.contains("Authored heading"));
    assert!(!html.contains(r#"data-block-name="hero""#));
}

#[tokio::test]
async fn test_account_page_gets_account_nav() {
    let ctx = TestContext::start().await;

    let html = ctx.get("/account").await.text().await.unwrap();
    assert!(html.contains(r#"data-block-name="account-nav""#));
    assert!(html.contains("Your orders"));

    let home = ctx.get("/").await.text().await.unwrap();
    assert!(!home.contains("account-nav"));
}

#[tokio::test]
async fn test_missing_page_is_not_found() {
    let ctx = TestContext::start().await;
    let resp = ctx.get("/no/such/page").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_echoed() {
    let ctx = TestContext::start().await;

    let resp = ctx
        .client
        .get(format!("{}/health", ctx.base_url))
        .header("x-request-id", "req-abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "req-abc-123"
    );

    let resp = ctx.get("/health").await;
    assert!(resp.headers().contains_key("x-request-id"));
}
