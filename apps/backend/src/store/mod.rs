//! Shared snapshot store: the durable side of the broadcast layer.
//!
//! Every server process reads and writes room/game snapshots through the
//! [`SharedStore`] trait and fans changes out by publishing the fresh
//! snapshot on the matching channel. Keys and channels share the same
//! `room:<code>` / `game:<code>` naming.

pub mod redis_store;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::domain::{DomainError, InfraErrorKind};

pub use redis_store::RedisStore;

/// Idle expiry for game snapshots. Set on first save, preserved
/// (KEEPTTL) on every subsequent save, so only successful
/// state-changing operations push the expiry out.
pub const GAME_TTL_SECONDS: u64 = 1800;

/// Idle expiry for room snapshots, refreshed by every room mutation so
/// abandoned lobbies fall out of the store on their own.
pub const ROOM_TTL_SECONDS: u64 = 1800;

/// TTL policy for a snapshot write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetPolicy {
    /// Fresh TTL in seconds (room saves, first game save).
    Expire(u64),
    /// Preserve whatever TTL the key already carries.
    KeepTtl,
}

#[async_trait]
pub trait SharedStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    async fn set(&self, key: &str, value: &str, policy: SetPolicy) -> Result<(), DomainError>;
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), DomainError>;
}

pub fn room_key(code: &str) -> String {
    format!("room:{code}")
}

pub fn game_key(code: &str) -> String {
    format!("game:{code}")
}

/// Fetch and decode a JSON snapshot; `None` when the key is absent.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn SharedStore,
    key: &str,
) -> Result<Option<T>, DomainError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    let decoded = serde_json::from_str(&raw).map_err(|err| {
        DomainError::infra(
            InfraErrorKind::Serde,
            format!("Failed to decode snapshot at {key}: {err}"),
        )
    })?;
    Ok(Some(decoded))
}

/// Encode and persist a JSON snapshot under the given TTL policy.
pub async fn put_json<T: Serialize>(
    store: &dyn SharedStore,
    key: &str,
    value: &T,
    policy: SetPolicy,
) -> Result<(), DomainError> {
    let raw = serde_json::to_string(value).map_err(|err| {
        DomainError::infra(
            InfraErrorKind::Serde,
            format!("Failed to encode snapshot for {key}: {err}"),
        )
    })?;
    store.set(key, &raw, policy).await
}
