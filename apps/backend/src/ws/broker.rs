//! Cross-process fanout: a background task psubscribes to `room:*` and
//! `game:*`, decodes each published snapshot, and hands it to the
//! in-process subscription registry. The loop reconnects with
//! exponential backoff and jitter on transient errors.

use std::sync::Arc;
use std::time::Duration;

use rand::random;
use redis::aio::PubSub;
use redis::Client;
use tokio::time::sleep;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};

use crate::domain::state::GameState;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::services::rooms::Room;
use crate::ws::registry::SubscriptionRegistry;

const INITIAL_RETRY_DELAY_SECS: u64 = 1;
const MAX_RETRY_DELAY_SECS: u64 = 60;
const RETRY_DELAY_MULTIPLIER: f64 = 2.0;
const JITTER_PERCENT: f64 = 0.2;

pub struct RealtimeBroker {
    registry: Arc<SubscriptionRegistry>,
}

impl RealtimeBroker {
    /// Validate the redis URL, spawn the subscriber task, and hand back
    /// the registry it feeds.
    pub fn connect(redis_url: &str) -> Result<Arc<Self>, DomainError> {
        // Fail fast on an unparseable URL before spawning anything.
        Client::open(redis_url).map_err(|err| {
            DomainError::infra(InfraErrorKind::Store, format!("Invalid REDIS_URL: {err}"))
        })?;

        let registry = Arc::new(SubscriptionRegistry::new());
        spawn_subscriber(redis_url, registry.clone());

        Ok(Arc::new(Self { registry }))
    }

    pub fn registry(&self) -> Arc<SubscriptionRegistry> {
        self.registry.clone()
    }
}

fn spawn_subscriber(redis_url: &str, registry: Arc<SubscriptionRegistry>) {
    let redis_url = redis_url.to_string();
    tokio::spawn(async move {
        run_subscription_loop_with_retry(&redis_url, registry).await;
    });
}

fn is_transient_error(err: &DomainError) -> bool {
    let msg = err.to_string().to_lowercase();

    if msg.contains("invalid redis_url")
        || msg.contains("authentication failed")
        || msg.contains("unsupported")
        || msg.contains("non-tcp protocol")
    {
        return false;
    }

    true
}

fn calculate_retry_delay(attempt: u32) -> Duration {
    let base_delay =
        INITIAL_RETRY_DELAY_SECS as f64 * RETRY_DELAY_MULTIPLIER.powi(attempt as i32 - 1);
    let capped_delay = base_delay.min(MAX_RETRY_DELAY_SECS as f64);

    let jitter_range = capped_delay * JITTER_PERCENT;
    let jitter = (random::<f64>() * 2.0 - 1.0) * jitter_range;
    let final_delay = (capped_delay + jitter).max(0.1);

    Duration::from_secs_f64(final_delay)
}

async fn run_subscription_loop_with_retry(redis_url: &str, registry: Arc<SubscriptionRegistry>) {
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match run_subscription_loop(redis_url, registry.clone()).await {
            Ok(()) => {
                info!("Redis subscription loop completed normally");
                break;
            }
            Err(err) => {
                if !is_transient_error(&err) {
                    error!(
                        error = %err,
                        attempt,
                        "Redis subscription failed with permanent error, exiting"
                    );
                    break;
                }

                let delay = calculate_retry_delay(attempt);
                warn!(
                    error = %err,
                    attempt,
                    retry_delay_secs = delay.as_secs_f64(),
                    "Redis subscription failed, retrying"
                );
                sleep(delay).await;

                // Keep the backoff window bounded on long outages.
                if attempt >= 20 {
                    attempt = 10;
                }
            }
        }
    }
}

async fn run_subscription_loop(
    redis_url: &str,
    registry: Arc<SubscriptionRegistry>,
) -> Result<(), DomainError> {
    let client = Client::open(redis_url).map_err(|err| {
        DomainError::infra(
            InfraErrorKind::Store,
            format!("Failed to create Redis client: {err}"),
        )
    })?;

    let conn_info = client.get_connection_info();

    let addr = match conn_info.addr().clone() {
        redis::ConnectionAddr::Tcp(host, port) => (host, port),
        _ => {
            return Err(DomainError::infra(
                InfraErrorKind::Store,
                "Only TCP protocol is supported for pubsub (non-TCP protocol)",
            ));
        }
    };

    info!(
        "Connecting to Redis for subscription at {}:{}",
        addr.0, addr.1
    );

    let stream = tokio::net::TcpStream::connect(addr).await.map_err(|err| {
        DomainError::infra(
            InfraErrorKind::Store,
            format!("Failed to connect to Redis for subscription: {err}"),
        )
    })?;

    let mut pubsub = PubSub::new(conn_info.redis_settings(), stream)
        .await
        .map_err(|err| {
            DomainError::infra(
                InfraErrorKind::Store,
                format!("Failed to create Redis pubsub: {err}"),
            )
        })?;

    info!("Subscribing to Redis patterns 'room:*' and 'game:*'");
    for pattern in ["room:*", "game:*"] {
        pubsub.psubscribe(pattern).await.map_err(|err| {
            DomainError::infra(
                InfraErrorKind::Store,
                format!("Failed to subscribe to Redis channel pattern {pattern}: {err}"),
            )
        })?;
    }

    info!("Redis subscription established, processing messages");

    let mut stream = pubsub.into_on_message();

    while let Some(msg) = stream.next().await {
        let Ok(channel) = msg.get_channel::<String>() else {
            continue;
        };
        let Ok(payload) = msg.get_payload::<String>() else {
            continue;
        };

        match parse_channel(&channel) {
            Some(("room", code)) => match serde_json::from_str::<Room>(&payload) {
                Ok(room) => registry.broadcast_room(code, room),
                Err(err) => {
                    error!(error = %err, channel = %channel, "Failed to decode room payload");
                }
            },
            Some(("game", code)) => match serde_json::from_str::<GameState>(&payload) {
                Ok(state) => registry.broadcast_game(code, state),
                Err(err) => {
                    error!(error = %err, channel = %channel, "Failed to decode game payload");
                }
            },
            _ => {
                warn!(channel = %channel, "[WS BROKER] message on unexpected channel");
            }
        }
    }

    warn!("Redis subscription stream ended, connection lost");
    Err(DomainError::infra(
        InfraErrorKind::Store,
        "Redis subscription stream ended unexpectedly",
    ))
}

fn parse_channel(channel: &str) -> Option<(&str, &str)> {
    let (prefix, code) = channel.split_once(':')?;
    match prefix {
        "room" | "game" => Some((prefix, code)),
        _ => None,
    }
}
