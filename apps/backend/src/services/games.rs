//! Game orchestration: start, fetch, and the play-move pipeline of
//! validate -> transition -> persist -> publish.

use tracing::info;
use uuid::Uuid;

use crate::domain::dealing::{init_game, SeatProfile};
use crate::domain::state::GameState;
use crate::domain::{apply_move, check_move, is_game_over, Card};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::services::rooms::{self, Room};
use crate::store::{self, SetPolicy, SharedStore, GAME_TTL_SECONDS};

/// Result of a play-move request. Rejections are data, not errors: the
/// caller turns them into a typed reply and keeps the session alive.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    Accepted { game_over: bool },
    Rejected { message: String },
}

pub async fn fetch_game(store: &dyn SharedStore, code: &str) -> Result<GameState, DomainError> {
    store::get_json(store, &store::game_key(code))
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, format!("Game {code} not found")))
}

async fn save_game(
    store: &dyn SharedStore,
    code: &str,
    state: &GameState,
    policy: SetPolicy,
) -> Result<(), DomainError> {
    store::put_json(store, &store::game_key(code), state, policy).await
}

async fn publish_game(
    store: &dyn SharedStore,
    code: &str,
    state: &GameState,
) -> Result<(), DomainError> {
    let payload = serde_json::to_string(state).map_err(|err| {
        DomainError::infra(
            InfraErrorKind::Serde,
            format!("Failed to encode game payload: {err}"),
        )
    })?;
    store.publish(&store::game_key(code), &payload).await
}

/// Start the match for a room: the caller must be the host, the room must
/// hold 3 or 4 connected clients, and every non-host client must be
/// ready. Consumes the ready flags, deals, persists the game with its
/// idle TTL, and publishes both topics.
pub async fn start_game(
    store: &dyn SharedStore,
    code: &str,
    client_id: Uuid,
) -> Result<(Room, GameState), DomainError> {
    let mut room = rooms::fetch_room(store, code).await?;

    let total_clients = room.connected_clients.len();
    if !(3..=4).contains(&total_clients) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            "Error starting game: not enough players to start the game!",
        ));
    }

    let ready_non_hosts = room
        .connected_clients
        .iter()
        .filter(|c| !c.is_host && c.is_ready)
        .count();
    if ready_non_hosts != total_clients - 1 {
        return Err(DomainError::validation_other(
            "Error starting game: other players are not ready yet!",
        ));
    }

    let host = room.connected_clients.iter().find(|c| c.is_host);
    if host.map(|c| c.id) != Some(client_id) {
        return Err(DomainError::validation_other(format!(
            "Error starting game: client {client_id} is not the host!"
        )));
    }

    let seats: Vec<SeatProfile> = room
        .connected_clients
        .iter()
        .map(|c| SeatProfile {
            id: c.id,
            name: c.name.clone(),
            avatar: c.avatar,
        })
        .collect();
    let game = init_game(&seats)?;

    save_game(store, code, &game, SetPolicy::Expire(GAME_TTL_SECONDS)).await?;

    // Consume the ready flags so a finished match can be restarted from
    // a clean lobby.
    for client in &mut room.connected_clients {
        client.is_ready = false;
    }
    room.is_game_started = true;
    room.is_game_over = false;
    rooms::save_and_publish_room(store, &room).await?;
    publish_game(store, code, &game).await?;

    info!(room_code = %code, players = total_clients, "game started");
    Ok((room, game))
}

/// Validate and apply one move. On acceptance the game snapshot is
/// re-saved preserving its TTL and published; a finished match also flips
/// the room's game-over flag and publishes the room topic.
pub async fn play_move(
    store: &dyn SharedStore,
    code: &str,
    client_id: Uuid,
    mov: &[Card],
) -> Result<PlayOutcome, DomainError> {
    let mut game = fetch_game(store, code).await?;

    let validity = check_move(&game, client_id, mov)?;
    if !validity.is_valid {
        info!(
            room_code = %code,
            client_id = %client_id,
            reason = %validity.error_message,
            "move rejected"
        );
        return Ok(PlayOutcome::Rejected {
            message: validity.error_message,
        });
    }

    apply_move(&mut game, mov)?;
    let game_over = is_game_over(&game);

    save_game(store, code, &game, SetPolicy::KeepTtl).await?;

    if game_over {
        let mut room = rooms::fetch_room(store, code).await?;
        room.is_game_over = true;
        rooms::save_and_publish_room(store, &room).await?;
        info!(room_code = %code, "game over");
    }
    publish_game(store, code, &game).await?;

    Ok(PlayOutcome::Accepted { game_over })
}
