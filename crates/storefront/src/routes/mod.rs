//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Catalog
//! GET  /api/categories                  - Category tree
//! GET  /api/categories/{url_key}        - Category by URL key
//! GET  /api/products?category=&...      - Products of a category
//! GET  /api/products/{sku}              - Product by sku
//! GET  /api/inventory                   - Customer inventory
//! GET  /api/pricing                     - Customer pricing
//! GET  /api/placeholders                - Site placeholders
//!
//! # Account (session scoped)
//! GET  /api/account                     - Selected account
//! PUT  /api/account/selected            - Select an account
//! PUT  /api/account/session             - Store the sign-in result
//! POST /api/account/sign-in             - Request sign-in
//! GET  /api/account/data/{key}          - Read account data
//! PUT  /api/account/data/{key}          - Write account data
//!
//! # Pages
//! GET  /{*path}                         - Decorated content page
//! ```

pub mod account;
pub mod catalog;
pub mod pages;

use axum::{
    Router,
    extract::Request,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{create_session_layer, request_id_middleware};
use crate::state::AppState;

/// Create the catalog API router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(catalog::categories))
        .route("/categories/{url_key}", get(catalog::category))
        .route("/products", get(catalog::products))
        .route("/products/{sku}", get(catalog::product))
        .route("/inventory", get(catalog::inventory))
        .route("/pricing", get(catalog::pricing))
        .route("/placeholders", get(catalog::placeholders))
}

/// Create the account API router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::selected))
        .route("/selected", put(account::select))
        .route("/session", put(account::set_session))
        .route("/sign-in", post(account::sign_in))
        .route(
            "/data/{key}",
            get(account::get_data).put(account::put_data),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", catalog_routes().nest("/account", account_routes()))
        .route("/", get(pages::page))
        .route("/{*path}", get(pages::page))
}

/// The complete application: routes, sessions, tracing and Sentry.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check upstreams.
async fn health() -> &'static str {
    "ok"
}
