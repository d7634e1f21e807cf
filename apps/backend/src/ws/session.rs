use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::player_view;
use crate::services::{games, rooms};
use crate::services::games::PlayOutcome;
use crate::state::app_state::AppState;
use crate::ws::protocol::{ClientMsg, ErrorType, ServerMsg};
use crate::ws::registry::{GameChanged, RoomChanged};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(app_state);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    /// Identity of this connection's player. A fresh id is minted at
    /// upgrade time; a `join` payload carrying a previous id replaces
    /// it so a reconnecting player keeps their seat.
    client_id: Uuid,
    room_code: Option<String>,
    app_state: web::Data<AppState>,

    // Mirrors of the latest room snapshot, used to decide between
    // leave and disconnect when the socket drops.
    is_game_started: bool,
    is_game_over: bool,

    last_heartbeat: Instant,
}

impl WsSession {
    fn new(app_state: web::Data<AppState>) -> Self {
        Self {
            client_id: Uuid::new_v4(),
            room_code: None,
            app_state,
            is_game_started: false,
            is_game_over: false,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, error_type: ErrorType, message: impl Into<String>) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                error_type,
                message: message.into(),
            },
        );
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    client_id = %actor.client_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn handle_join(
        &mut self,
        ctx: &mut ws::WebsocketContext<Self>,
        room_code: String,
        previous_id: Option<Uuid>,
        name: Option<String>,
        avatar: Option<crate::domain::state::Avatar>,
    ) {
        if let Some(id) = previous_id {
            self.client_id = id;
        }
        let client_id = self.client_id;
        let app_state = self.app_state.clone();
        let code = room_code.clone();

        ctx.spawn(
            async move {
                rooms::join_room(
                    app_state.shared_store(),
                    &code,
                    client_id,
                    name,
                    avatar,
                )
                .await
            }
            .into_actor(self)
            .map(move |res, actor, ctx| match res {
                Ok(room) => {
                    actor.room_code = Some(room_code.clone());
                    actor.is_game_started = room.is_game_started;
                    actor.is_game_over = room.is_game_over;

                    let registry = actor.app_state.subscriptions();
                    registry.subscribe_room(
                        &room_code,
                        actor.client_id,
                        ctx.address().recipient::<RoomChanged>(),
                    );

                    // Fanout already notified the others; echo the snapshot
                    // directly so the joiner learns its own id.
                    Self::send_json(
                        ctx,
                        &ServerMsg::RoomUpdated {
                            client_id: actor.client_id,
                            room,
                        },
                    );
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        client_id = %actor.client_id,
                        "[WS SESSION] join failed"
                    );
                    Self::send_error(ctx, ErrorType::Generic, err.to_string());
                }
            }),
        );
    }

    fn handle_set_ready(&self, ctx: &mut ws::WebsocketContext<Self>, is_ready: bool) {
        let Some(code) = self.room_code.clone() else {
            Self::send_error(ctx, ErrorType::Generic, "Not in a room");
            return;
        };
        let client_id = self.client_id;
        let app_state = self.app_state.clone();

        ctx.spawn(
            async move {
                rooms::update_ready_state(app_state.shared_store(), &code, client_id, is_ready)
                    .await
            }
            .into_actor(self)
            .map(|res, actor, ctx| {
                // Success surfaces through the room fanout.
                if let Err(err) = res {
                    warn!(
                        error = %err,
                        client_id = %actor.client_id,
                        "[WS SESSION] set-ready failed"
                    );
                    Self::send_error(ctx, ErrorType::Generic, err.to_string());
                }
            }),
        );
    }

    fn handle_start_game(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(code) = self.room_code.clone() else {
            Self::send_error(ctx, ErrorType::Generic, "Not in a room");
            return;
        };
        let client_id = self.client_id;
        let app_state = self.app_state.clone();

        ctx.spawn(
            async move { games::start_game(app_state.shared_store(), &code, client_id).await }
                .into_actor(self)
                .map(|res, actor, ctx| match res {
                    Ok((room, _game)) => {
                        actor.is_game_started = room.is_game_started;
                        actor.is_game_over = room.is_game_over;
                        // Everyone, host included, hears about it via fanout.
                    }
                    Err(err) => {
                        warn!(
                            error = %err,
                            client_id = %actor.client_id,
                            "[WS SESSION] start-game failed"
                        );
                        Self::send_error(ctx, ErrorType::Generic, err.to_string());
                    }
                }),
        );
    }

    fn handle_connect_to_game(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let Some(code) = self.room_code.clone() else {
            Self::send_error(ctx, ErrorType::Generic, "Not in a room");
            return;
        };
        let client_id = self.client_id;
        let app_state = self.app_state.clone();
        let fetch_code = code.clone();

        ctx.spawn(
            async move { games::fetch_game(app_state.shared_store(), &fetch_code).await }
                .into_actor(self)
                .map(move |res, actor, ctx| match res {
                    Ok(game) => {
                        let registry = actor.app_state.subscriptions();
                        registry.subscribe_game(
                            &code,
                            actor.client_id,
                            ctx.address().recipient::<GameChanged>(),
                        );

                        match player_view::project(client_id, &game) {
                            Ok(view) => {
                                Self::send_json(ctx, &ServerMsg::GameUpdated { game_state: view });
                            }
                            Err(err) => {
                                warn!(
                                    error = %err,
                                    client_id = %actor.client_id,
                                    "[WS SESSION] viewer not part of game"
                                );
                                Self::send_error(ctx, ErrorType::Generic, err.to_string());
                            }
                        }
                    }
                    Err(err) => {
                        warn!(
                            error = %err,
                            client_id = %actor.client_id,
                            "[WS SESSION] connect-to-game failed"
                        );
                        Self::send_error(ctx, ErrorType::Generic, err.to_string());
                    }
                }),
        );
    }

    fn handle_play_move(&self, ctx: &mut ws::WebsocketContext<Self>, mov: Vec<crate::domain::cards::Card>) {
        let Some(code) = self.room_code.clone() else {
            Self::send_error(ctx, ErrorType::Generic, "Not in a room");
            return;
        };
        let client_id = self.client_id;
        let app_state = self.app_state.clone();

        ctx.spawn(
            async move { games::play_move(app_state.shared_store(), &code, client_id, &mov).await }
                .into_actor(self)
                .map(|res, actor, ctx| match res {
                    Ok(PlayOutcome::Accepted { game_over }) => {
                        if game_over {
                            actor.is_game_over = true;
                        }
                        // Accepted moves surface through the game fanout.
                    }
                    Ok(PlayOutcome::Rejected { message }) => {
                        Self::send_error(ctx, ErrorType::InvalidMove, message);
                    }
                    Err(err) => {
                        warn!(
                            error = %err,
                            client_id = %actor.client_id,
                            "[WS SESSION] play-move failed"
                        );
                        Self::send_error(ctx, ErrorType::Generic, err.to_string());
                    }
                }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(client_id = %self.client_id, "[WS SESSION] started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        let Some(code) = self.room_code.clone() else {
            info!(client_id = %self.client_id, "[WS SESSION] stopped before joining");
            return;
        };

        self.app_state.subscriptions().unsubscribe(&code, self.client_id);

        let client_id = self.client_id;
        let app_state = self.app_state.clone();
        // Mid-game drops keep the seat so the player can rejoin;
        // otherwise the seat is released.
        let keep_seat = self.is_game_started && !self.is_game_over;

        actix::spawn(async move {
            let store = app_state.shared_store();
            let result = if keep_seat {
                rooms::disconnect_client(store, &code, client_id).await
            } else {
                rooms::leave_room(store, &code, client_id).await
            };
            if let Err(err) = result {
                warn!(
                    error = %err,
                    client_id = %client_id,
                    room_code = %code,
                    "[WS SESSION] cleanup after disconnect failed"
                );
            }
        });

        info!(client_id = %self.client_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    debug!(client_id = %self.client_id, "[WS SESSION] malformed message");
                    Self::send_error(ctx, ErrorType::Generic, "Malformed message");
                    return;
                };

                match cmd {
                    ClientMsg::Join(payload) => {
                        self.handle_join(
                            ctx,
                            payload.room_code,
                            payload.client_id,
                            payload.name,
                            payload.avatar,
                        );
                    }
                    ClientMsg::SetReady(payload) => {
                        self.handle_set_ready(ctx, payload.is_ready);
                    }
                    ClientMsg::StartGame => {
                        self.handle_start_game(ctx);
                    }
                    ClientMsg::ConnectToGame => {
                        self.handle_connect_to_game(ctx);
                    }
                    ClientMsg::PlayMove(payload) => {
                        self.handle_play_move(ctx, payload.mov);
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_error(ctx, ErrorType::Generic, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    client_id = %self.client_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<RoomChanged> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: RoomChanged, ctx: &mut Self::Context) -> Self::Result {
        let room = msg.0;
        self.is_game_started = room.is_game_started;
        self.is_game_over = room.is_game_over;
        Self::send_json(
            ctx,
            &ServerMsg::RoomUpdated {
                client_id: self.client_id,
                room,
            },
        );
    }
}

impl Handler<GameChanged> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: GameChanged, ctx: &mut Self::Context) -> Self::Result {
        match player_view::project(self.client_id, &msg.0) {
            Ok(view) => Self::send_json(ctx, &ServerMsg::GameUpdated { game_state: view }),
            Err(err) => {
                // A spectator of the room channel who never joined the
                // game sees nothing here.
                debug!(
                    error = %err,
                    client_id = %self.client_id,
                    "[WS SESSION] skipping game update for non-player"
                );
            }
        }
    }
}
