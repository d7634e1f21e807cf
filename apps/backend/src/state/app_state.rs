use std::sync::Arc;

use crate::store::SharedStore;
use crate::ws::registry::SubscriptionRegistry;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SharedStore>,
    registry: Arc<SubscriptionRegistry>,
}

impl AppState {
    pub fn new(store: Arc<dyn SharedStore>, registry: Arc<SubscriptionRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn shared_store(&self) -> &dyn SharedStore {
        self.store.as_ref()
    }

    pub fn subscriptions(&self) -> Arc<SubscriptionRegistry> {
        self.registry.clone()
    }

    /// State backed by the given store and a fresh, broker-less registry.
    #[cfg(test)]
    pub fn for_tests(store: Arc<dyn SharedStore>) -> Self {
        Self::new(store, Arc::new(SubscriptionRegistry::new()))
    }
}
