//! Server-side page decoration.
//!
//! Authored pages arrive as semantic HTML: `<main>` holds sections (`div`),
//! sections hold default content and blocks (`div.{name}` with rows and
//! cells). Decoration turns that into the markup the storefront blocks
//! expect, following the lifecycle in [`PageDecorator`].

mod autoblocks;
mod dom;
mod hooks;
mod lifecycle;

pub use autoblocks::{PageType, build_auto_block, build_hero_block, build_page_auto_blocks};
pub use dom::{
    build_block, build_single_cell_block, decorate_block, decorate_blocks, decorate_sections,
    get_metadata, make_links_relative, parse_document, to_camel_case, to_class_name,
};
pub use hooks::StorefrontHooks;
pub use lifecycle::{DecorationHooks, Page, PageDecorator};

use thiserror::Error;

use crate::commerce::CommerceError;

/// Errors raised while decorating a page.
#[derive(Debug, Error)]
pub enum DecorationError {
    /// An element selector did not parse.
    #[error("Invalid selector: {0}")]
    Selector(String),

    /// Eager loading of commerce data failed.
    #[error("Commerce error: {0}")]
    Commerce(#[from] CommerceError),

    /// Inline script data could not be encoded.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
