//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `CONTENT_ORIGIN` - Origin serving the authored page HTML and placeholders
//! - `COMMERCE_GRAPHQL_ENDPOINT` - GraphQL endpoint for the category taxonomy
//! - `COMMERCE_GRAPHQL_API_KEY` - API key sent with GraphQL requests
//! - `COMMERCE_LOOKUP_ORIGIN` - Origin of the product, inventory and pricing lookups
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `PRODUCT_IMAGE_SOURCE_ORIGIN` - Image origin rewritten to the lookup origin
//! - `PRODUCT_IMAGE_QUERY` - Optimisation query appended to product images
//!   (default: `format=webply&optimize=medium`)
//! - `PLACEHOLDERS_PREFIX` - Locale prefix of the placeholders sheet (default: /ca/en)
//! - `LCP_BLOCKS` - Comma separated blocks loaded eagerly (default: hero,product)
//! - `PRODUCTION_DOMAINS` - Comma separated hosts whose links become relative
//! - `DELAYED_SCRIPT` - Module imported by the delayed phase (default: /scripts/delayed.js)
//! - `DELAYED_LOAD_MS` - Delay before the delayed phase (default: 4000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_IMAGE_QUERY: &str = "format=webply&optimize=medium";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Origin serving authored pages (`{origin}{path}`)
    pub content_origin: Url,
    /// Commerce backend configuration
    pub commerce: CommerceConfig,
    /// Page decoration configuration
    pub decoration: DecorationConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Fraction of errors reported to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Commerce backend endpoints.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct CommerceConfig {
    /// GraphQL endpoint serving the category taxonomy
    pub graphql_endpoint: Url,
    /// API key passed as the `api_key` query parameter
    pub graphql_api_key: SecretString,
    /// Origin of `/productLookup`, `/inventory` and `/pricing`
    pub lookup_origin: Url,
    /// Image origin the lookup service returns, rewritten to `lookup_origin`
    pub image_source_origin: Option<String>,
    /// Query string appended to product images (without `?`)
    pub image_query: String,
}

impl std::fmt::Debug for CommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceConfig")
            .field("graphql_endpoint", &self.graphql_endpoint.as_str())
            .field("graphql_api_key", &"[REDACTED]")
            .field("lookup_origin", &self.lookup_origin.as_str())
            .field("image_source_origin", &self.image_source_origin)
            .field("image_query", &self.image_query)
            .finish()
    }
}

/// Page decoration settings.
#[derive(Debug, Clone)]
pub struct DecorationConfig {
    /// Blocks whose first image is loaded eagerly when they open the page
    pub lcp_blocks: Vec<String>,
    /// Hosts whose absolute links are rewritten to relative ones
    pub production_domains: Vec<String>,
    /// Locale prefix of the placeholders sheet
    pub placeholders_prefix: String,
    /// Module imported by the delayed phase
    pub delayed_script: String,
    /// Delay before the delayed phase, in milliseconds
    pub delayed_load_ms: u64,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            lcp_blocks: vec!["hero".to_string(), "product".to_string()],
            production_domains: Vec::new(),
            placeholders_prefix: "/ca/en".to_string(),
            delayed_script: "/scripts/delayed.js".to_string(),
            delayed_load_ms: 4000,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let content_origin = get_required_url("CONTENT_ORIGIN")?;

        let commerce = CommerceConfig::from_env()?;
        let decoration = DecorationConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            content_origin,
            commerce,
            decoration,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CommerceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            graphql_endpoint: get_required_url("COMMERCE_GRAPHQL_ENDPOINT")?,
            graphql_api_key: get_required_secret("COMMERCE_GRAPHQL_API_KEY")?,
            lookup_origin: get_required_url("COMMERCE_LOOKUP_ORIGIN")?,
            image_source_origin: get_optional_env("PRODUCT_IMAGE_SOURCE_ORIGIN"),
            image_query: get_env_or_default("PRODUCT_IMAGE_QUERY", DEFAULT_IMAGE_QUERY),
        })
    }
}

impl DecorationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            lcp_blocks: get_optional_env("LCP_BLOCKS")
                .map_or(defaults.lcp_blocks, |v| split_list(&v)),
            production_domains: get_optional_env("PRODUCTION_DOMAINS")
                .map_or(defaults.production_domains, |v| split_list(&v)),
            placeholders_prefix: get_optional_env("PLACEHOLDERS_PREFIX")
                .unwrap_or(defaults.placeholders_prefix),
            delayed_script: get_optional_env("DELAYED_SCRIPT").unwrap_or(defaults.delayed_script),
            delayed_load_ms: parse_env_or_default("DELAYED_LOAD_MS", "4000")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get a required environment variable and parse it as an absolute URL.
fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    let value = get_required_env(key)?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Split a comma separated list, dropping blanks.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
