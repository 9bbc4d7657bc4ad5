//! Account notifications.

use std::sync::{Arc, Mutex, PoisonError};

use eecol_core::AccountId;

/// Something that happened to the visitor's account state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    /// The selected account changed.
    AccountChanged { account_id: AccountId },
    /// The visitor asked to sign in.
    LoginRequested,
}

type Callback = Arc<dyn Fn(&AccountEvent) + Send + Sync>;

/// Handle returned by [`AccountEvents::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<(u64, Callback)>,
}

/// Subscriber list for [`AccountEvent`]s. Clones share the list.
#[derive(Clone, Default)]
pub struct AccountEvents {
    registry: Arc<Mutex<Registry>>,
}

impl AccountEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every subsequent event.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AccountEvent) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push((id, Arc::new(callback)));
        Subscription(id)
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut registry = self.lock();
        let before = registry.subscribers.len();
        registry.subscribers.retain(|(id, _)| *id != subscription.0);
        registry.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber, in subscription order.
    pub fn emit(&self, event: &AccountEvent) {
        // Callbacks run outside the lock so they may subscribe or emit.
        let callbacks: Vec<Callback> = self
            .lock()
            .subscribers
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AccountEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountEvents")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
