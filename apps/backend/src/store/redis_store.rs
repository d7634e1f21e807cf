//! Redis-backed [`SharedStore`] over a `ConnectionManager`.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, SetExpiry, SetOptions};
use tokio::sync::Mutex;

use super::{SetPolicy, SharedStore};
use crate::errors::domain::{DomainError, InfraErrorKind};

pub struct RedisStore {
    conn: Mutex<ConnectionManager>,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, DomainError> {
        let client = Client::open(redis_url).map_err(|err| {
            DomainError::infra(InfraErrorKind::Store, format!("Invalid REDIS_URL: {err}"))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|err| {
            DomainError::infra(
                InfraErrorKind::Store,
                format!("Unable to initialize Redis connection manager: {err}"),
            )
        })?;

        Ok(Self {
            conn: Mutex::new(manager),
        })
    }
}

fn store_err(op: &str, err: redis::RedisError) -> DomainError {
    DomainError::infra(InfraErrorKind::Store, format!("Redis {op} failed: {err}"))
}

#[async_trait]
impl SharedStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.conn.lock().await;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|err| store_err("GET", err))
    }

    async fn set(&self, key: &str, value: &str, policy: SetPolicy) -> Result<(), DomainError> {
        let mut conn = self.conn.lock().await;
        match policy {
            SetPolicy::Expire(secs) => conn
                .set_options::<_, _, ()>(
                    key,
                    value,
                    SetOptions::default().with_expiration(SetExpiry::EX(secs)),
                )
                .await
                .map_err(|err| store_err("SET EX", err)),
            SetPolicy::KeepTtl => conn
                .set_options::<_, _, ()>(
                    key,
                    value,
                    SetOptions::default().with_expiration(SetExpiry::KEEPTTL),
                )
                .await
                .map_err(|err| store_err("SET KEEPTTL", err)),
        }
    }

    async fn publish(&self, channel: &str, payload: &str) -> Result<(), DomainError> {
        let mut conn = self.conn.lock().await;
        conn.publish::<_, _, ()>(channel, payload)
            .await
            .map_err(|err| store_err("PUBLISH", err))
    }
}
