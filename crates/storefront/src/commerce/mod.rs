//! Commerce backend clients.
//!
//! # Architecture
//!
//! - Category taxonomy comes from a GraphQL endpoint, queried with GET
//! - Products, inventory and pricing come from a JSON lookup service
//! - Responses are decoded into typed envelopes at the boundary; anything
//!   that does not decode is a [`CommerceError::Decode`]
//! - No retries and no response caching except the category taxonomy, which
//!   lives in a [`CategoryCache`] for the lifetime of the process
//!
//! # Example
//!
//! ```rust,ignore
//! use eecol_storefront::commerce::{CategoryCache, CategoryClient, LookupClient};
//!
//! let cache = CategoryCache::new(CategoryClient::new(http.clone(), &config.commerce));
//! let wire = cache.by_key("wire-cable").await?;
//!
//! let lookup = LookupClient::new(http, &config.commerce);
//! let products = lookup.lookup_category(wire.as_ref().map(|c| &c.uid), None).await?;
//! ```

mod cache;
mod categories;
mod lookup;

pub use cache::{CategoryCache, CategorySource};
pub use categories::{CATEGORIES_QUERY, CategoryClient};
pub use lookup::{LookupClient, rewrite_image_url};

use thiserror::Error;

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response decoded but a required part was absent.
    #[error("Missing data: {0}")]
    MissingData(&'static str),
}

/// A GraphQL error returned by the taxonomy endpoint.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(e: graphql_client::Error) -> Self {
        Self {
            message: e.message,
            locations: e.locations.map_or_else(Vec::new, |locs| {
                locs.into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: e.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Truncate a response body for logging.
fn excerpt(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = CommerceError::Status {
            endpoint: "/pricing".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        assert_eq!(err.to_string(), "/pricing returned HTTP 502 Bad Gateway");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field not found".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: String::new(),
                locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
                path: vec![
                    serde_json::Value::String("categories".to_string()),
                    serde_json::Value::Number(0.into()),
                ],
            },
        ];
        let err = CommerceError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; path: categories.0 at line 5:10"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let err = CommerceError::GraphQL(vec![GraphQLError {
            message: String::new(),
            locations: vec![],
            path: vec![],
        }]);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");

        let err = CommerceError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_excerpt_truncates() {
        let long = "x".repeat(800);
        assert_eq!(excerpt(&long).len(), 500);
    }
}
