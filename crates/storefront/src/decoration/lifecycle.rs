//! Page decoration lifecycle.
//!
//! Phases run in a fixed order: eager loading, auto-blocks, section and
//! block decoration, LCP hinting, header, delayed loading. Site specific
//! behaviour plugs in through [`DecorationHooks`]; a failing hook is logged
//! and the remaining phases still run.

use std::future::Future;

use kuchikiki::NodeRef;
use tracing::{debug, error, instrument, warn};

use super::DecorationError;
use super::dom::{
    build_single_cell_block, create_element, decorate_block, decorate_blocks,
    decorate_sections, get_attribute, get_metadata, parse_document, select_first,
    set_attribute,
};
use crate::config::DecorationConfig;

/// A parsed page being decorated.
pub struct Page {
    document: NodeRef,
}

impl Page {
    /// Parse a full HTML document.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            document: parse_document(html),
        }
    }

    #[must_use]
    pub const fn document(&self) -> &NodeRef {
        &self.document
    }

    /// The `<main>` element, if the page has one.
    #[must_use]
    pub fn main(&self) -> Option<NodeRef> {
        select_first(&self.document, "main").ok().flatten()
    }

    /// Page metadata from `<meta>` tags.
    #[must_use]
    pub fn metadata(&self, name: &str) -> Option<String> {
        get_metadata(&self.document, name)
    }

    /// The `<header>` element, created at the top of `<body>` when missing.
    fn header(&self) -> Option<NodeRef> {
        if let Some(header) = select_first(&self.document, "header").ok().flatten() {
            return Some(header);
        }
        let body = self.body()?;
        let header = create_element("header", &[]);
        body.prepend(header.clone());
        Some(header)
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> Option<NodeRef> {
        select_first(&self.document, "body").ok().flatten()
    }

    /// Serialise the page back to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.document.to_string()
    }
}

/// Site specific steps of the decoration lifecycle.
///
/// Every method has a no-op default.
pub trait DecorationHooks: Send + Sync {
    /// Work that must finish before the page is decorated.
    fn load_eager(&self) -> impl Future<Output = Result<(), DecorationError>> + Send {
        async { Ok(()) }
    }

    /// Synthesise blocks from the content of `main`.
    fn build_auto_blocks(&self, _page: &Page, _main: &NodeRef) -> Result<(), DecorationError> {
        Ok(())
    }

    /// Extend the header after the framework header block is in place.
    fn load_header(&self, _page: &Page, _header: &NodeRef) -> Result<(), DecorationError> {
        Ok(())
    }

    /// Schedule work for after the page has settled.
    fn load_delayed(&self, _page: &Page) -> Result<(), DecorationError> {
        Ok(())
    }
}

/// Runs the decoration lifecycle over authored pages.
#[derive(Debug, Clone)]
pub struct PageDecorator {
    config: DecorationConfig,
}

impl PageDecorator {
    #[must_use]
    pub const fn new(config: DecorationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &DecorationConfig {
        &self.config
    }

    /// Decorate a page: eager loading first, then the DOM phases.
    ///
    /// An eager loading failure is logged and decoration continues.
    #[instrument(skip_all)]
    pub async fn decorate<H: DecorationHooks>(&self, hooks: &H, html: &str) -> String {
        if let Err(e) = hooks.load_eager().await {
            warn!(error = %e, "Eager loading failed");
        }
        self.decorate_document(hooks, html)
    }

    /// The synchronous DOM phases of [`PageDecorator::decorate`].
    ///
    /// Pages without `<main>` are returned unchanged.
    pub fn decorate_document<H: DecorationHooks>(&self, hooks: &H, html: &str) -> String {
        let page = Page::parse(html);
        let Some(main) = page.main() else {
            debug!("Page has no main element");
            return html.to_string();
        };

        if let Err(e) = hooks.build_auto_blocks(&page, &main) {
            error!(error = %e, "Auto blocking failed");
        }

        decorate_sections(&main);
        let blocks = decorate_blocks(&main).unwrap_or_else(|e| {
            warn!(error = %e, "Block decoration failed");
            Vec::new()
        });
        self.mark_lcp(&main, blocks.first());

        if let Some(header) = page.header() {
            let header_block = build_single_cell_block("header", vec![]);
            header.append(header_block.clone());
            decorate_block(&header_block);

            if let Err(e) = hooks.load_header(&page, &header) {
                warn!(error = %e, "Header loading failed");
            }
        }

        if let Err(e) = hooks.load_delayed(&page) {
            warn!(error = %e, "Delayed loading failed");
        }

        page.to_html()
    }

    /// Flag an opening LCP block and load the first image of `main` eagerly.
    fn mark_lcp(&self, main: &NodeRef, first_block: Option<&NodeRef>) {
        if let Some(block) = first_block
            && let Some(name) = get_attribute(block, "data-block-name")
            && self.config.lcp_blocks.iter().any(|b| *b == name)
        {
            set_attribute(block, "data-lcp", "true");
        }

        if let Ok(Some(img)) = select_first(main, "img") {
            set_attribute(&img, "loading", "eager");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::decoration::dom::{has_class, select_all};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHooks {
        eager: AtomicUsize,
        fail_auto_blocks: bool,
    }

    impl DecorationHooks for CountingHooks {
        async fn load_eager(&self) -> Result<(), DecorationError> {
            self.eager.fetch_add(1, Ordering::SeqCst);
            Err(DecorationError::Selector("eager".to_string()))
        }

        fn build_auto_blocks(&self, _page: &Page, main: &NodeRef) -> Result<(), DecorationError> {
            if self.fail_auto_blocks {
                return Err(DecorationError::Selector("main >>".to_string()));
            }
            let section = create_element("div", &[]);
            section.append(build_single_cell_block("hero", vec![create_element("img", &[])]));
            main.append(section);
            Ok(())
        }
    }

    fn decorator() -> PageDecorator {
        PageDecorator::new(DecorationConfig::default())
    }

    const PAGE: &str = "<html><head></head><body><header></header><main><div><p>Hi</p></div></main></body></html>";

    #[test]
    fn test_page_without_main_is_unchanged() {
        let html = "<html><body><p>plain</p></body></html>";
        assert_eq!(decorator().decorate_document(&CountingHooks::default(), html), html);
    }

    #[tokio::test]
    async fn test_eager_failure_does_not_stop_decoration() {
        let hooks = CountingHooks::default();
        let html = decorator().decorate(&hooks, PAGE).await;

        assert_eq!(hooks.eager.load(Ordering::SeqCst), 1);
        assert!(html.contains("data-block-name=\"hero\""));
        assert!(html.contains("data-section-status=\"initialized\""));
    }

    #[test]
    fn test_lcp_and_header() {
        let page = Page::parse(&decorator().decorate_document(&CountingHooks::default(), PAGE));
        let main = page.main().unwrap();

        let hero = select_first(&main, ".hero").unwrap().unwrap();
        assert_eq!(get_attribute(&hero, "data-lcp").as_deref(), Some("true"));
        let img = select_first(&main, "img").unwrap().unwrap();
        assert_eq!(get_attribute(&img, "loading").as_deref(), Some("eager"));

        let header_block = select_first(page.document(), "header > div.header").unwrap().unwrap();
        assert!(has_class(&header_block, "block"));
    }

    #[test]
    fn test_auto_block_failure_still_decorates_sections() {
        let hooks = CountingHooks {
            fail_auto_blocks: true,
            ..CountingHooks::default()
        };
        let page = Page::parse(&decorator().decorate_document(&hooks, PAGE));
        let main = page.main().unwrap();

        assert_eq!(select_all(&main, "div.section").unwrap().len(), 1);
        assert!(select_all(&main, ".hero").unwrap().is_empty());
    }

    #[test]
    fn test_header_created_when_missing() {
        let html = "<html><body><main><div><p>x</p></div></main></body></html>";
        let page = Page::parse(&decorator().decorate_document(&CountingHooks::default(), html));
        assert!(select_first(page.document(), "body > header > .header").unwrap().is_some());
    }
}
