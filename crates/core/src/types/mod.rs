//! Core types for the EECOL storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod account;
pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use account::{Account, AccountConfig, SessionAccount};
pub use category::{Category, CategoryIndex, CategorySummary, CategoryTree};
pub use id::*;
pub use price::{CurrencyCode, CurrencyError, Price, format_currency};
pub use product::{LookupEnvelope, Product, ProductList, RecordData};
