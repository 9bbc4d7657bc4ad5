//! Application state shared across handlers.

use std::sync::Arc;

use tower_sessions::Session;
use tracing::info;

use crate::account::{AccountEvent, AccountEvents, AccountSession, SessionStorage};
use crate::commerce::{CategoryCache, CategoryClient, LookupClient};
use crate::config::StorefrontConfig;
use crate::content::ContentClient;
use crate::decoration::{PageDecorator, StorefrontHooks};

/// Account state backed by the visitor's session.
pub type VisitorAccount = AccountSession<SessionStorage, SessionStorage>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. All upstream clients share
/// one HTTP connection pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    categories: CategoryCache,
    lookup: LookupClient,
    content: ContentClient,
    decorator: PageDecorator,
    hooks: StorefrontHooks,
    account_events: AccountEvents,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Nothing is fetched here; the category taxonomy loads on first use.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let http = reqwest::Client::new();

        let categories = CategoryCache::new(CategoryClient::new(http.clone(), &config.commerce));
        let lookup = LookupClient::new(http.clone(), &config.commerce);
        let content = ContentClient::new(http, config.content_origin.clone());
        let decorator = PageDecorator::new(config.decoration.clone());
        let hooks = StorefrontHooks::new(categories.clone(), config.decoration.clone());

        let account_events = AccountEvents::new();
        account_events.subscribe(|event| match event {
            AccountEvent::AccountChanged { account_id } => {
                info!(account_id = %account_id, "Account changed");
            }
            AccountEvent::LoginRequested => info!("Login requested"),
        });

        Self {
            inner: Arc::new(AppStateInner {
                config,
                categories,
                lookup,
                content,
                decorator,
                hooks,
                account_events,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the category taxonomy cache.
    #[must_use]
    pub fn categories(&self) -> &CategoryCache {
        &self.inner.categories
    }

    /// Get a reference to the product lookup client.
    #[must_use]
    pub fn lookup(&self) -> &LookupClient {
        &self.inner.lookup
    }

    /// Get a reference to the content origin client.
    #[must_use]
    pub fn content(&self) -> &ContentClient {
        &self.inner.content
    }

    #[must_use]
    pub fn decorator(&self) -> &PageDecorator {
        &self.inner.decorator
    }

    #[must_use]
    pub fn hooks(&self) -> &StorefrontHooks {
        &self.inner.hooks
    }

    /// Account state of the visitor owning `session`.
    #[must_use]
    pub fn account_session(&self, session: Session) -> VisitorAccount {
        AccountSession::new(
            SessionStorage::local(session.clone()),
            SessionStorage::session(session),
            self.inner.account_events.clone(),
        )
    }
}
