//! Integration tests for the session scoped account API.
//!
//! The reqwest client keeps the session cookie, so each test is one visitor.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use eecol_integration_tests::{TestContext, session_account};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_anonymous_visitor_has_no_account() {
    let ctx = TestContext::start().await;

    let resp = ctx.get("/api/account").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn test_first_account_selected_by_default() {
    let ctx = TestContext::start().await;
    ctx.put_json("/api/account/session", &session_account()).await;

    let account: Value = ctx.get("/api/account").await.json().await.unwrap();
    assert_eq!(account["accountId"], "1001");
    assert_eq!(account["name"], "Main Branch");

    // The fallback is persisted, so the next read resolves through accountsById.
    let account: Value = ctx.get("/api/account").await.json().await.unwrap();
    assert_eq!(account["config"]["Categories"], json!(["WIRE & CABLE"]));
}

#[tokio::test]
async fn test_select_account() {
    let ctx = TestContext::start().await;
    ctx.put_json("/api/account/session", &session_account()).await;

    let resp = ctx
        .put_json("/api/account/selected", &json!({ "accountId": "2002" }))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let account: Value = ctx.get("/api/account").await.json().await.unwrap();
    assert_eq!(account["accountId"], "2002");
    assert_eq!(account["name"], "North Yard");
}

#[tokio::test]
async fn test_unknown_selection_falls_back_to_first() {
    let ctx = TestContext::start().await;
    ctx.put_json("/api/account/session", &session_account()).await;
    ctx.put_json("/api/account/selected", &json!({ "accountId": "9999" }))
        .await;

    let account: Value = ctx.get("/api/account").await.json().await.unwrap();
    assert_eq!(account["accountId"], "1001");
}

#[tokio::test]
async fn test_session_without_name_is_signed_out() {
    let ctx = TestContext::start().await;
    let mut account = session_account();
    account["name"] = json!("");
    ctx.put_json("/api/account/session", &account).await;

    let body: Value = ctx.get("/api/account").await.json().await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn test_empty_account_id_rejected() {
    let ctx = TestContext::start().await;

    let resp = ctx
        .put_json("/api/account/selected", &json!({ "accountId": "" }))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_in_request_accepted() {
    let ctx = TestContext::start().await;
    let resp = ctx.post("/api/account/sign-in").await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
}

// =============================================================================
// Account Scoped Data
// =============================================================================

#[tokio::test]
async fn test_user_data_scoped_to_selected_account() {
    let ctx = TestContext::start().await;
    ctx.put_json("/api/account/session", &session_account()).await;
    ctx.put_json("/api/account/selected", &json!({ "accountId": "1001" }))
        .await;

    let cart = json!({ "items": [{ "sku": "ABC-123", "qty": 2 }] });
    let resp = ctx.put_json("/api/account/data/cart", &cart).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let stored: Value = ctx.get("/api/account/data/cart").await.json().await.unwrap();
    assert_eq!(stored, cart);

    ctx.put_json("/api/account/selected", &json!({ "accountId": "2002" }))
        .await;
    let other: Value = ctx.get("/api/account/data/cart").await.json().await.unwrap();
    assert!(other.is_null());
}

#[tokio::test]
async fn test_text_user_data() {
    let ctx = TestContext::start().await;
    ctx.put_json("/api/account/selected", &json!({ "accountId": "1001" }))
        .await;

    ctx.put_json("/api/account/data/note", &json!("call before delivery"))
        .await;

    let stored: Value = ctx.get("/api/account/data/note").await.json().await.unwrap();
    assert_eq!(stored, json!("call before delivery"));
}

#[tokio::test]
async fn test_user_data_requires_selected_account() {
    let ctx = TestContext::start().await;

    let resp = ctx
        .put_json("/api/account/data/cart", &json!({ "items": [] }))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = ctx.get("/api/account/data/cart").await.json().await.unwrap();
    assert!(body.is_null());
}
