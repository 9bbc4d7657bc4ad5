//! Integration tests for the EECOL storefront.
//!
//! Each test starts two servers on ephemeral ports:
//!
//! - a mock upstream answering as the commerce GraphQL endpoint, the
//!   product lookup service and the content origin
//! - the storefront itself, configured against the mock
//!
//! ```rust,ignore
//! let ctx = TestContext::start().await;
//! let resp = ctx.get("/api/categories").await;
//! assert_eq!(resp.status(), 200);
//! assert_eq!(ctx.upstream.category_requests(), 1);
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use eecol_storefront::config::{CommerceConfig, DecorationConfig, StorefrontConfig};
use eecol_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// API key the mock GraphQL endpoint expects.
pub const TEST_API_KEY: &str = "test-api-key";

// =============================================================================
// Mock Upstream
// =============================================================================

/// Counters and origin of the mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    pub url: Url,
    counters: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    categories: AtomicUsize,
    placeholders: AtomicUsize,
}

impl MockUpstream {
    /// Start the mock on an ephemeral port.
    pub async fn start() -> Self {
        let counters = Arc::new(Counters::default());
        let router = Router::new()
            .route("/graphql", get(graphql))
            .route("/productLookup", get(product_lookup))
            .route("/inventory", get(inventory))
            .route("/pricing", get(pricing))
            .route("/ca/en/placeholders.json", get(placeholders))
            .fallback(content_page)
            .with_state(Arc::clone(&counters));

        let addr = serve(router).await;
        Self {
            url: Url::parse(&format!("http://{addr}")).expect("valid mock url"),
            counters,
        }
    }

    /// Number of taxonomy requests received.
    #[must_use]
    pub fn category_requests(&self) -> usize {
        self.counters.categories.load(Ordering::SeqCst)
    }

    /// Number of placeholder sheet requests received.
    #[must_use]
    pub fn placeholder_requests(&self) -> usize {
        self.counters.placeholders.load(Ordering::SeqCst)
    }

    fn endpoint(&self, path: &str) -> Url {
        self.url.join(path).expect("valid mock endpoint")
    }
}

async fn graphql(
    State(counters): State<Arc<Counters>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    counters.categories.fetch_add(1, Ordering::SeqCst);

    if params.get("api_key").map(String::as_str) != Some(TEST_API_KEY) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if !params.get("query").is_some_and(|q| q.contains("categories")) {
        return StatusCode::BAD_REQUEST.into_response();
    }

    Json(json!({
        "data": {
            "categories": {
                "total_count": 1,
                "items": [{
                    "uid": "Mg==",
                    "level": 1,
                    "url_key": null,
                    "name": "Default Category",
                    "children": [
                        {
                            "uid": "Mw==",
                            "level": 2,
                            "url_key": "wire-cable",
                            "url_path": "wire-cable",
                            "name": "WIRE & CABLE",
                            "children_count": "1",
                            "children": [{
                                "uid": "NQ==",
                                "level": 3,
                                "url_key": "building-wire",
                                "url_path": "wire-cable/building-wire",
                                "name": "Building Wire",
                                "children": []
                            }]
                        },
                        {
                            "uid": "NA==",
                            "level": 2,
                            "url_key": "lighting",
                            "url_path": "lighting",
                            "name": "Lighting",
                            "children_count": "0",
                            "children": []
                        }
                    ]
                }],
                "page_info": { "current_page": 1, "page_size": 20, "total_pages": 1 }
            }
        }
    }))
    .into_response()
}

async fn product_lookup(Query(params): Query<HashMap<String, String>>) -> Response {
    if let Some(sku) = params.get("sku") {
        let data = if sku == "ABC-123" {
            json!([product("ABC-123", "Mw==")])
        } else {
            json!([])
        };
        return Json(json!({ "data": data })).into_response();
    }

    match params.get("category").map(String::as_str) {
        Some("Mw==") => {
            let data = if params.get("brand").map(String::as_str) == Some("3M") {
                json!([product("ABC-123", "Mw==")])
            } else {
                json!([product("ABC-123", "Mw=="), product("LGT-9", "NA==")])
            };
            Json(json!({ "data": data, "meta": { "total": 2 } })).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn product(sku: &str, category: &str) -> Value {
    json!({
        "sku": sku,
        "name": format!("Product {sku}"),
        "image": format!("https://images.example.com/{sku}.jpg"),
        "categories": [category]
    })
}

async fn inventory(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "data": {
            "customerId": params.get("customerId"),
            "productId": params.get("productId"),
            "available": 42
        }
    }))
}

async fn pricing(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "data": {
            "customerId": params.get("customerId"),
            "productId": params.get("productId"),
            "price": "19.5"
        }
    }))
}

async fn placeholders(State(counters): State<Arc<Counters>>) -> Json<Value> {
    counters.placeholders.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "total": 3,
        "data": [
            { "Key": "add-to-cart", "Text": "Add to Cart" },
            { "Key": "Search Products", "Text": "Search" },
            { "Key": "", "Text": "Ignored" }
        ]
    }))
}

async fn content_page(uri: Uri) -> Response {
    match pages().get(uri.path()) {
        Some(html) => Html(*html).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn pages() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        (
            "/",
            r#"<html><head><title>Home</title></head><body><header></header><main>
<div><h1>Everything Electrical</h1><picture><img src="/media/hero.jpg"></picture><p>Welcome</p></div>
<div><div class="cards"><div><div>Card</div></div></div></div>
</main><footer></footer></body></html>"#,
        ),
        (
            "/wire-cable",
            r#"<html><head><title>Wire</title><meta name="pagetype" content="category"></head>
<body><header></header><main><div><h1>Authored heading</h1></div></main><footer></footer></body></html>"#,
        ),
        (
            "/account",
            r#"<html><head><title>Account</title><meta name="template" content="account"></head>
<body><header></header><main><div><h2>Your orders</h2></div></main><footer></footer></body></html>"#,
        ),
    ])
}

// =============================================================================
// Test Context
// =============================================================================

/// A running storefront wired to a [`MockUpstream`].
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub state: AppState,
    pub upstream: MockUpstream,
}

impl TestContext {
    /// Start the mock upstream and a storefront configured against it.
    pub async fn start() -> Self {
        let upstream = MockUpstream::start().await;
        let state = AppState::new(test_config(&upstream));
        let addr = serve(eecol_storefront::app(state.clone())).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            state,
            upstream,
        }
    }

    /// GET `path` on the storefront.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("storefront request failed")
    }

    /// PUT `body` as JSON to `path` on the storefront.
    pub async fn put_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .expect("storefront request failed")
    }

    /// POST with an empty body to `path` on the storefront.
    pub async fn post(&self, path: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("storefront request failed")
    }
}

/// Storefront configuration pointing every upstream at `upstream`.
#[must_use]
pub fn test_config(upstream: &MockUpstream) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost".to_string(),
        content_origin: upstream.url.clone(),
        commerce: CommerceConfig {
            graphql_endpoint: upstream.endpoint("/graphql"),
            graphql_api_key: SecretString::from(TEST_API_KEY),
            lookup_origin: upstream.url.clone(),
            image_source_origin: Some("https://images.example.com".to_string()),
            image_query: "format=webply&optimize=medium".to_string(),
        },
        decoration: DecorationConfig {
            production_domains: vec!["www.eecol.com".to_string()],
            ..DecorationConfig::default()
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A signed-in visitor with two accounts; only the first has a catalog config.
#[must_use]
pub fn session_account() -> Value {
    json!({
        "name": "Pat Doe",
        "accounts": [
            { "accountId": "1001", "name": "Main Branch" },
            { "accountId": "2002", "name": "North Yard" }
        ],
        "accountsById": {
            "1001": {
                "accountId": "1001",
                "name": "Main Branch",
                "config": { "Categories": ["WIRE & CABLE"] }
            },
            "2002": { "accountId": "2002", "name": "North Yard" }
        }
    })
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });
    addr
}
