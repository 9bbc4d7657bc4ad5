//! Blocks synthesised from page content rather than authored.

use std::fmt;
use std::str::FromStr;

use kuchikiki::NodeRef;

use super::DecorationError;
use super::dom::{build_single_cell_block, clear_children, create_element, precedes, select_first};

/// Page types whose content is rendered entirely by a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    Category,
    Product,
}

impl PageType {
    /// Name of the block that renders this page type.
    #[must_use]
    pub const fn block_name(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Product => "product",
        }
    }
}

impl FromStr for PageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "category" => Ok(Self::Category),
            "product" => Ok(Self::Product),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.block_name())
    }
}

/// Move the first `<h1>` and first `<picture>` of `main` into a hero block.
///
/// Only applies when the heading comes before the picture. The hero gets a
/// new section at the top of `main`. Returns whether a hero was built.
///
/// # Errors
///
/// Returns an error if an element selector does not parse.
pub fn build_hero_block(main: &NodeRef) -> Result<bool, DecorationError> {
    let (Some(h1), Some(picture)) = (select_first(main, "h1")?, select_first(main, "picture")?)
    else {
        return Ok(false);
    };

    if !precedes(main, &h1, &picture) {
        return Ok(false);
    }

    let section = create_element("div", &[]);
    section.append(build_single_cell_block("hero", vec![picture, h1]));
    main.prepend(section);
    Ok(true)
}

/// Add a section holding an empty `name` block to `main`.
///
/// With `replace`, the existing content of `main` is removed and a
/// `breadcrumbs` block opens the section. With `prepend` the section goes
/// first, otherwise last. Returns the new section.
pub fn build_auto_block(main: &NodeRef, name: &str, replace: bool, prepend: bool) -> NodeRef {
    let section = create_element("div", &[]);
    section.append(build_single_cell_block(name, vec![]));

    if replace {
        clear_children(main);
        section.prepend(build_single_cell_block("breadcrumbs", vec![]));
    }

    if prepend {
        main.prepend(section.clone());
    } else {
        main.append(section.clone());
    }
    section
}

/// Auto-blocks for a page: a full-page block for known page types, the hero
/// heuristic otherwise.
///
/// # Errors
///
/// Returns an error if an element selector does not parse.
pub fn build_page_auto_blocks(main: &NodeRef, page_type: Option<&str>) -> Result<(), DecorationError> {
    match page_type.and_then(|t| t.parse::<PageType>().ok()) {
        Some(page_type) => {
            build_auto_block(main, page_type.block_name(), true, false);
        }
        None => {
            build_hero_block(main)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::decoration::dom::{parse_document, select_all};

    fn main_of(html: &str) -> NodeRef {
        let doc = parse_document(html);
        select_first(&doc, "main").unwrap().unwrap()
    }

    fn inner(node: &NodeRef) -> String {
        node.children().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_page_type_parse() {
        assert_eq!("category".parse::<PageType>(), Ok(PageType::Category));
        assert_eq!(" product ".parse::<PageType>(), Ok(PageType::Product));
        assert!("blog".parse::<PageType>().is_err());
        assert_eq!(PageType::Product.to_string(), "product");
    }

    #[test]
    fn test_hero_when_heading_precedes_picture() {
        let main = main_of(
            "<main><div><h1>Title</h1><picture><img src=\"a.png\"></picture><p>Body</p></div></main>",
        );

        assert!(build_hero_block(&main).unwrap());
        assert_eq!(
            inner(&main),
            "<div><div class=\"hero\"><div><div><picture><img src=\"a.png\"></picture><h1>Title</h1></div></div></div></div>\
             <div><p>Body</p></div>"
        );
    }

    #[test]
    fn test_no_hero_when_picture_comes_first() {
        let html = "<main><div><picture><img src=\"a.png\"></picture><h1>Title</h1></div></main>";
        let main = main_of(html);
        let before = inner(&main);

        assert!(!build_hero_block(&main).unwrap());
        assert_eq!(inner(&main), before);
    }

    #[test]
    fn test_no_hero_without_picture_or_heading() {
        assert!(!build_hero_block(&main_of("<main><div><h1>Only</h1></div></main>")).unwrap());
        assert!(
            !build_hero_block(&main_of("<main><div><picture></picture></div></main>")).unwrap()
        );
    }

    #[test]
    fn test_category_page_replaces_main() {
        let main = main_of("<main><div><h1>Old</h1><p>Old content</p></div></main>");

        build_page_auto_blocks(&main, Some("category")).unwrap();

        assert_eq!(
            inner(&main),
            "<div><div class=\"breadcrumbs\"><div><div></div></div></div>\
             <div class=\"category\"><div><div></div></div></div></div>"
        );
    }

    #[test]
    fn test_unknown_page_type_uses_hero_heuristic() {
        let main = main_of(
            "<main><div><h1>Title</h1><picture></picture></div></main>",
        );
        build_page_auto_blocks(&main, Some("article")).unwrap();
        assert_eq!(select_all(&main, ".hero").unwrap().len(), 1);
    }

    #[test]
    fn test_auto_block_append_and_prepend() {
        let main = main_of("<main><div><p>Keep</p></div></main>");

        build_auto_block(&main, "promo", false, true);
        build_auto_block(&main, "footer-cta", false, false);

        assert_eq!(
            inner(&main),
            "<div><div class=\"promo\"><div><div></div></div></div></div>\
             <div><p>Keep</p></div>\
             <div><div class=\"footer-cta\"><div><div></div></div></div></div>"
        );
    }
}
