//! Process-wide category taxonomy cache.
//!
//! The taxonomy is fetched once, on first access, and kept for the lifetime
//! of the cache. Concurrent first callers share one in-flight fetch. A failed
//! fetch leaves the cache empty so the next access tries again.

use std::future::Future;
use std::sync::Arc;

use eecol_core::{Category, CategorySummary, CategoryTree};
use tokio::sync::OnceCell;
use tracing::info;

use super::{CategoryClient, CommerceError};

/// Anything that can produce the root categories.
pub trait CategorySource: Send + Sync {
    /// Fetch the root categories with their subtrees.
    fn fetch_categories(&self) -> impl Future<Output = Result<Vec<Category>, CommerceError>> + Send;
}

/// Shared, lazily populated category taxonomy.
///
/// Cheaply cloneable; clones share the same cell.
pub struct CategoryCache<S = CategoryClient> {
    inner: Arc<CategoryCacheInner<S>>,
}

struct CategoryCacheInner<S> {
    source: S,
    tree: OnceCell<Arc<CategoryTree>>,
}

impl<S> Clone for CategoryCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: CategorySource> CategoryCache<S> {
    /// Create an empty cache backed by `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(CategoryCacheInner {
                source,
                tree: OnceCell::new(),
            }),
        }
    }

    /// Whether the taxonomy has been fetched.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.tree.initialized()
    }

    /// The taxonomy if already fetched, without triggering a fetch.
    #[must_use]
    pub fn peek(&self) -> Option<Arc<CategoryTree>> {
        self.inner.tree.get().cloned()
    }

    /// The taxonomy, fetching it on first access.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when the taxonomy is not cached yet and the
    /// source fails.
    pub async fn tree(&self) -> Result<Arc<CategoryTree>, CommerceError> {
        self.inner
            .tree
            .get_or_try_init(|| async {
                let roots = self.inner.source.fetch_categories().await?;
                let tree = CategoryTree::new(roots);
                info!(categories = tree.len(), "Category taxonomy cached");
                Ok::<_, CommerceError>(Arc::new(tree))
            })
            .await
            .cloned()
    }

    /// Root categories in upstream order.
    ///
    /// # Errors
    ///
    /// See [`CategoryCache::tree`].
    pub async fn categories(&self) -> Result<Vec<Category>, CommerceError> {
        Ok(self.tree().await?.roots().to_vec())
    }

    /// Category summary by URL key.
    ///
    /// # Errors
    ///
    /// See [`CategoryCache::tree`].
    pub async fn by_key(&self, url_key: &str) -> Result<Option<CategorySummary>, CommerceError> {
        Ok(self.tree().await?.index().get_by_key(url_key).cloned())
    }

    /// Category summary by uid.
    ///
    /// # Errors
    ///
    /// See [`CategoryCache::tree`].
    pub async fn by_id(&self, uid: &str) -> Result<Option<CategorySummary>, CommerceError> {
        Ok(self.tree().await?.index().get_by_uid(uid).cloned())
    }

    /// Category summary by display name.
    ///
    /// # Errors
    ///
    /// See [`CategoryCache::tree`].
    pub async fn by_name(&self, name: &str) -> Result<Option<CategorySummary>, CommerceError> {
        Ok(self.tree().await?.index().get_by_name(name).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::json;

    /// Counts fetches; fails while `failures_left` is non-zero.
    struct FakeSource {
        calls: AtomicUsize,
        failures_left: AtomicUsize,
    }

    impl FakeSource {
        fn new(failures: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures_left: AtomicUsize::new(failures),
            }
        }
    }

    impl CategorySource for FakeSource {
        async fn fetch_categories(&self) -> Result<Vec<Category>, CommerceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;

            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(CommerceError::MissingData("categories.items[0]"));
            }

            Ok(serde_json::from_value(json!([
                {
                    "uid": "Mw==", "url_key": "wire-cable", "name": "Wire & Cable",
                    "children": [{ "uid": "NA==", "url_key": "building-wire", "name": "Building Wire" }]
                }
            ]))
            .unwrap())
        }
    }

    #[tokio::test]
    async fn test_two_accesses_fetch_once() {
        let cache = CategoryCache::new(FakeSource::new(0));
        assert!(!cache.is_loaded());

        let roots = cache.categories().await.unwrap();
        let by_key = cache.by_key("building-wire").await.unwrap();

        assert_eq!(roots.len(), 1);
        assert_eq!(by_key.unwrap().name, "Building Wire");
        assert!(cache.is_loaded());
        assert_eq!(cache.inner.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_is_single_flight() {
        let cache = CategoryCache::new(FakeSource::new(0));

        let (a, b, c) = tokio::join!(
            cache.by_id("Mw=="),
            cache.by_name("Building Wire"),
            cache.tree()
        );

        assert!(a.unwrap().is_some());
        assert!(b.unwrap().is_some());
        assert_eq!(c.unwrap().len(), 2);
        assert_eq!(cache.inner.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_unset() {
        let cache = CategoryCache::new(FakeSource::new(1));

        assert!(cache.tree().await.is_err());
        assert!(!cache.is_loaded());
        assert!(cache.peek().is_none());

        assert!(cache.tree().await.is_ok());
        assert!(cache.peek().is_some());
        assert_eq!(cache.inner.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clones_share_the_cell() {
        let cache = CategoryCache::new(FakeSource::new(0));
        let clone = cache.clone();

        cache.tree().await.unwrap();
        assert!(clone.is_loaded());
        assert!(clone.by_key("missing").await.unwrap().is_none());
        assert_eq!(cache.inner.source.calls.load(Ordering::SeqCst), 1);
    }
}
