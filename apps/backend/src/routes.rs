use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::services::rooms;
use crate::state::app_state::AppState;
use crate::ws::session;
use crate::AppError;

async fn create_room(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let code = rooms::create_room(app_state.shared_store()).await?;
    info!(room_code = %code, "room created");
    Ok(HttpResponse::Ok().json(json!({ "roomCode": code })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(crate::health::configure_routes)
        .route("/create", web::get().to(create_room))
        .route("/ws", web::get().to(session::upgrade));
}
