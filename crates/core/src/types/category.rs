//! Category taxonomy and its flattened lookup index.
//!
//! The commerce backend returns categories as a tree. Page scripts look
//! categories up by URL key (routing), by uid (product hints) and by display
//! name (account entitlements), so the tree is flattened once into three
//! mappings whose values are shallow copies without children.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::id::CategoryUid;

/// A node of the category taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub uid: CategoryUid,
    /// URL-safe key, unique across the taxonomy.
    pub url_key: String,
    /// Full URL path (e.g. `wire-cable/building-wire`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    /// Display name.
    pub name: String,
    /// Nesting level (root catalog is 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    /// Slash separated id path (e.g. `1/2/14`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Number of direct children as reported upstream.
    #[serde(
        default,
        deserialize_with = "deserialize_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub children_count: Option<u32>,
    /// Store-scoped path, only present on second level nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_in_store: Option<String>,
    /// Ordered children.
    #[serde(default, deserialize_with = "deserialize_children")]
    pub children: Vec<Category>,
}

/// A category without its children.
///
/// This is the value type of every [`CategoryIndex`] mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub uid: CategoryUid,
    pub url_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_in_store: Option<String>,
}

impl Category {
    /// Shallow copy of this node with the children removed.
    #[must_use]
    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            uid: self.uid.clone(),
            url_key: self.url_key.clone(),
            url_path: self.url_path.clone(),
            name: self.name.clone(),
            level: self.level,
            path: self.path.clone(),
            children_count: self.children_count,
            path_in_store: self.path_in_store.clone(),
        }
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}

/// Flattened lookup mappings over every node of a category tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryIndex {
    by_key: HashMap<String, CategorySummary>,
    by_uid: HashMap<CategoryUid, CategorySummary>,
    by_name: HashMap<String, CategorySummary>,
}

impl CategoryIndex {
    /// Flatten every node of `roots`, regardless of depth.
    ///
    /// Nodes are visited depth-first in pre-order; when two nodes share a
    /// key the later one wins.
    #[must_use]
    pub fn build(roots: &[Category]) -> Self {
        let mut index = Self::default();
        for root in roots {
            index.insert_subtree(root);
        }
        index
    }

    fn insert_subtree(&mut self, category: &Category) {
        let summary = category.summary();
        self.by_key
            .insert(category.url_key.clone(), summary.clone());
        self.by_uid.insert(category.uid.clone(), summary.clone());
        self.by_name.insert(category.name.clone(), summary);

        for child in &category.children {
            self.insert_subtree(child);
        }
    }

    /// Mapping keyed by URL key.
    #[must_use]
    pub const fn by_key(&self) -> &HashMap<String, CategorySummary> {
        &self.by_key
    }

    /// Mapping keyed by uid.
    #[must_use]
    pub const fn by_uid(&self) -> &HashMap<CategoryUid, CategorySummary> {
        &self.by_uid
    }

    /// Mapping keyed by display name.
    #[must_use]
    pub const fn by_name(&self) -> &HashMap<String, CategorySummary> {
        &self.by_name
    }

    /// Look a category up by URL key.
    #[must_use]
    pub fn get_by_key(&self, url_key: &str) -> Option<&CategorySummary> {
        self.by_key.get(url_key)
    }

    /// Look a category up by uid.
    #[must_use]
    pub fn get_by_uid(&self, uid: &str) -> Option<&CategorySummary> {
        self.by_uid.get(uid)
    }

    /// Look a category up by display name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&CategorySummary> {
        self.by_name.get(name)
    }
}

/// A fetched taxonomy: the root list plus its index, built together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTree {
    roots: Vec<Category>,
    #[serde(skip)]
    index: CategoryIndex,
}

impl CategoryTree {
    /// Build the index for `roots`.
    #[must_use]
    pub fn new(roots: Vec<Category>) -> Self {
        let index = CategoryIndex::build(&roots);
        Self { roots, index }
    }

    /// Root categories in upstream order.
    #[must_use]
    pub fn roots(&self) -> &[Category] {
        &self.roots
    }

    /// The flattened mappings.
    #[must_use]
    pub const fn index(&self) -> &CategoryIndex {
        &self.index
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.iter().map(Category::subtree_len).sum()
    }

    /// Whether the tree has no categories at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Magento reports `children_count` as a string; older mocks send a number.
fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u32),
        Text(String),
    }

    match Option::<Count>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Count::Number(n)) => Ok(Some(n)),
        Some(Count::Text(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Leaf nodes come back with `children: null`.
fn deserialize_children<'de, D>(deserializer: D) -> Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Category>>::deserialize(deserializer)?.unwrap_or_default())
}
