use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use deuces_backend::config::AppConfig;
use deuces_backend::middleware::cors::cors_middleware;
use deuces_backend::routes;
use deuces_backend::state::app_state::AppState;
use deuces_backend::store::redis_store::RedisStore;
use deuces_backend::ws::broker::RealtimeBroker;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Deuces Backend on http://{}:{}",
        config.host, config.port
    );

    let store = match RedisStore::connect(&config.redis_url).await {
        Ok(store) => Arc::new(store),
        Err(err) => {
            eprintln!("❌ Failed to connect to Redis: {err}");
            std::process::exit(1);
        }
    };

    println!("✅ Redis connected");

    let broker = match RealtimeBroker::connect(&config.redis_url) {
        Ok(broker) => broker,
        Err(err) => {
            eprintln!("❌ Failed to start realtime broker: {err}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(store, broker.registry());
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
