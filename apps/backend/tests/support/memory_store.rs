//! In-memory stand-in for the shared snapshot store. Snapshots live in a
//! map, publishes are recorded instead of fanned out, and TTL policies
//! are recorded but not enforced.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use deuces_backend::errors::domain::DomainError;
use deuces_backend::store::{SetPolicy, SharedStore};

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
    policies: Mutex<Vec<(String, SetPolicy)>>,
    published: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(channel, payload)` publish in order.
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().expect("published lock").clone()
    }

    pub fn last_published_on(&self, channel: &str) -> Option<String> {
        self.published
            .lock()
            .expect("published lock")
            .iter()
            .rev()
            .find(|(ch, _)| ch == channel)
            .map(|(_, payload)| payload.clone())
    }

    pub fn publish_count(&self, channel: &str) -> usize {
        self.published
            .lock()
            .expect("published lock")
            .iter()
            .filter(|(ch, _)| ch == channel)
            .count()
    }

    /// Raw stored value, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.lock().expect("data lock").get(key).cloned()
    }

    /// Every TTL policy written for a key, in order.
    pub fn policies_for(&self, key: &str) -> Vec<SetPolicy> {
        self.policies
            .lock()
            .expect("policies lock")
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, policy)| *policy)
            .collect()
    }
}

#[async_trait]
impl SharedStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.data.lock().expect("data lock").get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, policy: SetPolicy) -> Result<(), DomainError> {
        self.data
            .lock()
            .expect("data lock")
            .insert(key.to_string(), value.to_string());
        self.policies
            .lock()
            .expect("policies lock")
            .push((key.to_string(), policy));
        Ok(())
    }

    async fn publish(&self, channel: &str, payload: &str) -> Result<(), DomainError> {
        self.published
            .lock()
            .expect("published lock")
            .push((channel.to_string(), payload.to_string()));
        Ok(())
    }
}
