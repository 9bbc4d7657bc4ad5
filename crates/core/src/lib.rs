//! EECOL Core - Shared domain types.
//!
//! This crate provides the types shared by every EECOL storefront component:
//! - `storefront` - Edge page decoration service and commerce API proxy
//! - `cli` - Command-line tools for catalog inspection and offline decoration
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no DOM. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Category taxonomy, products, accounts, prices and IDs
//! - [`text`] - Small string helpers shared by page scripts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod text;
pub mod types;

pub use types::*;
