//! EECOL storefront library.
//!
//! Decorates authored content pages at the edge and proxies the commerce
//! backend (category taxonomy, product lookups, customer pricing and
//! inventory). Exposed as a library so the binary, the CLI and the
//! integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod commerce;
pub mod config;
pub mod content;
pub mod decoration;
pub mod error;
pub mod location;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::app;
