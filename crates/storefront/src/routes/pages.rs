//! Decorated content pages.

use axum::{extract::State, http::Uri, response::Html};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Fetch an authored page from the content origin and decorate it.
///
/// GET /{*path}
#[instrument(skip(state))]
pub async fn page(State(state): State<AppState>, uri: Uri) -> Result<Html<String>> {
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());

    let html = state
        .content()
        .fetch_page(path_and_query)
        .await?
        .ok_or_else(|| AppError::NotFound(uri.path().to_string()))?;

    let decorated = state.decorator().decorate(state.hooks(), &html).await;
    Ok(Html(decorated))
}
