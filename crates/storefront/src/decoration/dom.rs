//! DOM helpers shared by the decoration phases.
//!
//! Thin wrappers over `kuchikiki` so the phases read in terms of blocks,
//! sections and classes instead of qualified names and attribute maps.

use html5ever::{LocalName, Namespace, QualName};
use kuchikiki::traits::TendrilSink;
use kuchikiki::{Attribute, ExpandedName, NodeRef};
use url::Url;

use super::DecorationError;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Hosts whose links are always made relative, on top of the configured
/// production domains.
const PREVIEW_HOSTS: [&str; 2] = ["hlx.page", "hlx.live"];

/// Parse a complete HTML document.
#[must_use]
pub fn parse_document(html: &str) -> NodeRef {
    kuchikiki::parse_html().one(html)
}

/// Create an HTML element with the given classes.
#[must_use]
pub fn create_element(tag: &str, classes: &[&str]) -> NodeRef {
    let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag));
    let class = classes
        .iter()
        .copied()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let attributes = (!class.is_empty()).then(|| {
        (
            ExpandedName::new("", "class"),
            Attribute {
                prefix: None,
                value: class,
            },
        )
    });

    NodeRef::new_element(name, attributes)
}

/// Build a block: `div.{name} > div (row) > div (cell) > elements`.
#[must_use]
pub fn build_block(name: &str, rows: Vec<Vec<Vec<NodeRef>>>) -> NodeRef {
    let block = create_element("div", &[name]);
    for row in rows {
        let row_el = create_element("div", &[]);
        for cell in row {
            let cell_el = create_element("div", &[]);
            for elem in cell {
                cell_el.append(elem);
            }
            row_el.append(cell_el);
        }
        block.append(row_el);
    }
    block
}

/// Build a block with one row holding one cell.
#[must_use]
pub fn build_single_cell_block(name: &str, elems: Vec<NodeRef>) -> NodeRef {
    build_block(name, vec![vec![elems]])
}

/// First element matching `selector` below `root`.
///
/// # Errors
///
/// Returns an error if the selector does not parse.
pub fn select_first(root: &NodeRef, selector: &str) -> Result<Option<NodeRef>, DecorationError> {
    Ok(select_all(root, selector)?.into_iter().next())
}

/// All elements matching `selector` below `root`, in document order.
///
/// # Errors
///
/// Returns an error if the selector does not parse.
pub fn select_all(root: &NodeRef, selector: &str) -> Result<Vec<NodeRef>, DecorationError> {
    let matches = root
        .select(selector)
        .map_err(|()| DecorationError::Selector(selector.to_string()))?;
    Ok(matches.map(|m| m.as_node().clone()).collect())
}

/// Whether `node` is an element with the given (lower-case) tag.
#[must_use]
pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    node.as_element().is_some_and(|el| &*el.name.local == tag)
}

/// Element children of `node`.
pub fn element_children(node: &NodeRef) -> impl Iterator<Item = NodeRef> {
    node.children().filter(|child| child.as_element().is_some())
}

#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|el| el.attributes.borrow().get(name).map(str::to_string))
}

pub fn set_attribute(node: &NodeRef, name: &str, value: &str) {
    if let Some(el) = node.as_element() {
        el.attributes.borrow_mut().insert(name, value.to_string());
    }
}

/// Class list of an element, in attribute order.
#[must_use]
pub fn classes(node: &NodeRef) -> Vec<String> {
    get_attribute(node, "class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

#[must_use]
pub fn has_class(node: &NodeRef, class: &str) -> bool {
    classes(node).iter().any(|c| c == class)
}

pub fn add_class(node: &NodeRef, class: &str) {
    let mut list = classes(node);
    if list.iter().any(|c| c == class) {
        return;
    }
    list.push(class.to_string());
    set_attribute(node, "class", &list.join(" "));
}

/// Nearest inclusive ancestor carrying `class`.
#[must_use]
pub fn closest_with_class(node: &NodeRef, class: &str) -> Option<NodeRef> {
    node.inclusive_ancestors().find(|n| has_class(n, class))
}

/// Remove every child of `node`.
pub fn clear_children(node: &NodeRef) {
    for child in node.children().collect::<Vec<_>>() {
        child.detach();
    }
}

/// Whether `a` comes before `b` in document order below `root`.
#[must_use]
pub fn precedes(root: &NodeRef, a: &NodeRef, b: &NodeRef) -> bool {
    if a == b {
        return false;
    }
    root.inclusive_descendants()
        .find(|n| n == a || n == b)
        .is_some_and(|first| first == *a)
}

/// Content of the `<meta>` tags named `name`, joined with `", "`.
///
/// Names containing `:` are matched against the `property` attribute
/// (Open Graph style), all others against `name`.
#[must_use]
pub fn get_metadata(document: &NodeRef, name: &str) -> Option<String> {
    let attr = if name.contains(':') { "property" } else { "name" };
    let values: Vec<String> = document
        .descendants()
        .filter(|n| is_tag(n, "meta"))
        .filter(|n| get_attribute(n, attr).as_deref() == Some(name))
        .filter_map(|n| get_attribute(&n, "content"))
        .collect();

    (!values.is_empty()).then(|| values.join(", "))
}

/// Wrap each section's children and mark it as a section.
///
/// Consecutive non-`div` children (default content) share one
/// `default-content-wrapper`; every `div` child gets a wrapper of its own.
pub fn decorate_sections(main: &NodeRef) {
    for section in element_children(main).filter(|n| is_tag(n, "div")).collect::<Vec<_>>() {
        let mut wrappers: Vec<NodeRef> = Vec::new();
        let mut default_content = false;

        for child in element_children(&section).collect::<Vec<_>>() {
            let is_div = is_tag(&child, "div");
            if is_div || !default_content || wrappers.is_empty() {
                let wrapper = if is_div {
                    create_element("div", &[])
                } else {
                    create_element("div", &["default-content-wrapper"])
                };
                wrappers.push(wrapper);
                default_content = !is_div;
            }
            if let Some(wrapper) = wrappers.last() {
                wrapper.append(child);
            }
        }

        for wrapper in wrappers {
            section.append(wrapper);
        }
        add_class(&section, "section");
        set_attribute(&section, "data-section-status", "initialized");
    }
}

/// Decorate every block in decorated sections. Returns them in document order.
///
/// # Errors
///
/// Returns an error if the block selector does not parse.
pub fn decorate_blocks(main: &NodeRef) -> Result<Vec<NodeRef>, DecorationError> {
    let blocks = select_all(main, "div.section > div > div")?;
    Ok(blocks.into_iter().filter(decorate_block).collect())
}

/// Mark an element as a block named after its first class.
///
/// Returns `false` when the element has no class or is already a block.
pub fn decorate_block(block: &NodeRef) -> bool {
    let Some(name) = classes(block).into_iter().next() else {
        return false;
    };
    if has_class(block, "block") {
        return false;
    }

    add_class(block, "block");
    set_attribute(block, "data-block-name", &name);
    set_attribute(block, "data-block-status", "initialized");

    if let Some(wrapper) = block.parent() {
        add_class(&wrapper, &format!("{name}-wrapper"));
    }
    if let Some(section) = closest_with_class(block, "section") {
        add_class(&section, &format!("{name}-container"));
    }
    true
}

/// Rewrite absolute links to preview and production hosts as relative links.
///
/// Subdomains of a listed host match too. Relative and unparseable hrefs
/// are left alone.
pub fn make_links_relative(root: &NodeRef, production_domains: &[String]) {
    let anchors = root.inclusive_descendants().filter(|n| is_tag(n, "a"));

    for anchor in anchors {
        let Some(href) = get_attribute(&anchor, "href") else {
            continue;
        };
        let Ok(url) = Url::parse(&href) else {
            continue;
        };
        let Some(host) = url.host_str() else {
            continue;
        };

        let listed = PREVIEW_HOSTS
            .iter()
            .copied()
            .chain(production_domains.iter().map(String::as_str))
            .any(|h| host == h || host.ends_with(&format!(".{h}")));

        if listed {
            let mut relative = url.path().to_string();
            if let Some(query) = url.query() {
                relative.push('?');
                relative.push_str(query);
            }
            if let Some(fragment) = url.fragment() {
                relative.push('#');
                relative.push_str(fragment);
            }
            set_attribute(&anchor, "href", &relative);
        }
    }
}

/// Sanitise a name into a CSS class: lower case, runs of anything other
/// than `a-z0-9` collapsed to one `-`, no leading or trailing `-`.
#[must_use]
pub fn to_class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// [`to_class_name`], then `-x` becomes `X`.
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    let class = to_class_name(name);
    let mut out = String::with_capacity(class.len());
    let mut chars = class.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '-'
            && let Some(&next) = chars.peek()
            && next.is_ascii_lowercase()
        {
            out.push(next.to_ascii_uppercase());
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}
