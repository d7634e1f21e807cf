//! In-process subscription registry: strongly-typed per-topic maps of
//! room code -> client id -> actix recipient. The broker feeds it from
//! the cross-process pub/sub stream; sessions register themselves on
//! join/connect and are dropped on close.

use actix::prelude::*;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::state::GameState;
use crate::services::rooms::Room;

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct RoomChanged(pub Room);

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct GameChanged(pub GameState);

#[derive(Default)]
pub struct SubscriptionRegistry {
    rooms: DashMap<String, DashMap<Uuid, Recipient<RoomChanged>>>,
    games: DashMap<String, DashMap<Uuid, Recipient<GameChanged>>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_room(&self, code: &str, client_id: Uuid, recipient: Recipient<RoomChanged>) {
        self.rooms
            .entry(code.to_string())
            .or_default()
            .insert(client_id, recipient);
    }

    pub fn subscribe_game(&self, code: &str, client_id: Uuid, recipient: Recipient<GameChanged>) {
        self.games
            .entry(code.to_string())
            .or_default()
            .insert(client_id, recipient);
    }

    /// Drop both topic subscriptions for one client.
    pub fn unsubscribe(&self, code: &str, client_id: Uuid) {
        if let Some(entry) = self.rooms.get(code) {
            entry.remove(&client_id);
            if entry.is_empty() {
                drop(entry);
                self.rooms.remove_if(code, |_, subs| subs.is_empty());
            }
        }
        if let Some(entry) = self.games.get(code) {
            entry.remove(&client_id);
            if entry.is_empty() {
                drop(entry);
                self.games.remove_if(code, |_, subs| subs.is_empty());
            }
        }
    }

    pub fn broadcast_room(&self, code: &str, room: Room) {
        if let Some(entry) = self.rooms.get(code) {
            for recipient in entry.iter() {
                let _ = recipient.value().do_send(RoomChanged(room.clone()));
            }
        }
    }

    pub fn broadcast_game(&self, code: &str, state: GameState) {
        if let Some(entry) = self.games.get(code) {
            for recipient in entry.iter() {
                let _ = recipient.value().do_send(GameChanged(state.clone()));
            }
        }
    }
}
