//! Storefront behaviour for the decoration lifecycle.

use kuchikiki::NodeRef;
use tracing::debug;

use super::DecorationError;
use super::autoblocks::build_page_auto_blocks;
use super::dom::{
    build_single_cell_block, create_element, decorate_block, make_links_relative, set_attribute,
};
use super::lifecycle::{DecorationHooks, Page};
use crate::commerce::{CategoryCache, CategoryClient, CategorySource};
use crate::config::DecorationConfig;

/// Decoration hooks of the storefront.
///
/// - Eager: the category taxonomy is loaded before any block needs it
/// - Auto-blocks: `pagetype` metadata selects a full-page block, otherwise
///   the hero heuristic runs
/// - Header: account pages get an `account-nav` block ahead of `main`
/// - Delayed: the delayed module is imported after a fixed delay
pub struct StorefrontHooks<S = CategoryClient> {
    categories: CategoryCache<S>,
    config: DecorationConfig,
}

impl<S> StorefrontHooks<S> {
    #[must_use]
    pub const fn new(categories: CategoryCache<S>, config: DecorationConfig) -> Self {
        Self { categories, config }
    }
}

impl<S: CategorySource> DecorationHooks for StorefrontHooks<S> {
    async fn load_eager(&self) -> Result<(), DecorationError> {
        self.categories.tree().await?;
        Ok(())
    }

    fn build_auto_blocks(&self, page: &Page, main: &NodeRef) -> Result<(), DecorationError> {
        build_page_auto_blocks(main, page.metadata("pagetype").as_deref())
    }

    fn load_header(&self, page: &Page, _header: &NodeRef) -> Result<(), DecorationError> {
        if page.metadata("template").as_deref() != Some("account") {
            return Ok(());
        }
        let Some(main) = page.main() else {
            return Ok(());
        };

        let account_nav = build_single_cell_block("account-nav", vec![]);
        decorate_block(&account_nav);
        main.insert_before(account_nav.clone());
        make_links_relative(&account_nav, &self.config.production_domains);
        debug!("Added account navigation");
        Ok(())
    }

    fn load_delayed(&self, page: &Page) -> Result<(), DecorationError> {
        let Some(body) = page.body() else {
            return Ok(());
        };

        let script = create_element("script", &[]);
        set_attribute(&script, "type", "module");
        script.append(NodeRef::new_text(delayed_loader(
            &self.config.delayed_script,
            self.config.delayed_load_ms,
        )?));
        body.append(script);
        Ok(())
    }
}

/// Inline module that imports `script` after `delay_ms`.
fn delayed_loader(script: &str, delay_ms: u64) -> Result<String, DecorationError> {
    let specifier = serde_json::to_string(script)?;
    Ok(format!("setTimeout(() => import({specifier}), {delay_ms});"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commerce::CommerceError;
    use crate::decoration::dom::{get_attribute, select_all, select_first};
    use crate::decoration::lifecycle::PageDecorator;
    use eecol_core::Category;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        calls: Arc<AtomicUsize>,
    }

    impl CategorySource for StaticSource {
        async fn fetch_categories(&self) -> Result<Vec<Category>, CommerceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn hooks() -> StorefrontHooks<StaticSource> {
        counted_hooks(Arc::new(AtomicUsize::new(0)))
    }

    fn counted_hooks(calls: Arc<AtomicUsize>) -> StorefrontHooks<StaticSource> {
        let config = DecorationConfig {
            production_domains: vec!["poc-staging.eecol.com".to_string()],
            ..DecorationConfig::default()
        };
        StorefrontHooks::new(
            CategoryCache::new(StaticSource { calls }),
            config,
        )
    }

    fn page(meta: &str, main: &str) -> String {
        format!(
            "<html><head>{meta}</head><body><header></header><main>{main}</main><footer></footer></body></html>"
        )
    }

    #[tokio::test]
    async fn test_eager_loads_categories() {
        let calls = Arc::new(AtomicUsize::new(0));
        let hooks = counted_hooks(Arc::clone(&calls));
        let decorator = PageDecorator::new(DecorationConfig::default());

        decorator.decorate(&hooks, &page("", "<div><p>a</p></div>")).await;
        decorator.decorate(&hooks, &page("", "<div><p>b</p></div>")).await;

        assert!(hooks.categories.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_category_page() {
        let hooks = hooks();
        let html = PageDecorator::new(DecorationConfig::default()).decorate_document(
            &hooks,
            &page(
                r#"<meta name="pagetype" content="category">"#,
                "<div><h1>Authored</h1></div>",
            ),
        );
        let page = Page::parse(&html);
        let main = page.main().unwrap();

        let blocks = select_all(&main, ".block").unwrap();
        let names: Vec<_> = blocks
            .iter()
            .map(|b| get_attribute(b, "data-block-name").unwrap())
            .collect();
        assert_eq!(names, ["breadcrumbs", "category"]);
        assert!(!html.contains("Authored"));
    }

    #[test]
    fn test_account_template_adds_nav_before_main() {
        let hooks = hooks();
        let html = PageDecorator::new(DecorationConfig::default())
            .decorate_document(&hooks, &page(r#"<meta name="template" content="account">"#, ""));
        let page = Page::parse(&html);

        let nav = select_first(page.document(), "body > .account-nav").unwrap().unwrap();
        assert_eq!(get_attribute(&nav, "data-block-name").as_deref(), Some("account-nav"));
        let next = nav.following_siblings().find(|n| n.as_element().is_some()).unwrap();
        assert!(next.as_element().is_some_and(|el| &*el.name.local == "main"));
    }

    #[test]
    fn test_no_account_nav_on_other_templates() {
        let html = PageDecorator::new(DecorationConfig::default())
            .decorate_document(&hooks(), &page("", "<div><p>x</p></div>"));
        assert!(!html.contains("account-nav"));
    }

    #[test]
    fn test_delayed_script_appended() {
        let html = PageDecorator::new(DecorationConfig::default())
            .decorate_document(&hooks(), &page("", "<div><p>x</p></div>"));
        let page = Page::parse(&html);

        let script = select_first(page.document(), "body > script[type=module]").unwrap().unwrap();
        assert_eq!(
            script.text_contents(),
            "setTimeout(() => import(\"/scripts/delayed.js\"), 4000);"
        );
    }
}
