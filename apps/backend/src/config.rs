use std::env;

use crate::error::AppError;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub redis_url: String,
}

impl AppConfig {
    /// Environment variables must be set by the runtime environment:
    /// - Docker: via docker-compose env_file or docker run --env-file
    /// - Local dev: source env files manually (e.g., set -a; . ./.env; set +a)
    ///
    /// Unset variables fall back to localhost defaults; a present but
    /// malformed value is a hard error.
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got {raw:?}"))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        if !redis_url.starts_with("redis://") && !redis_url.starts_with("rediss://") {
            return Err(AppError::config(format!(
                "REDIS_URL must start with redis:// or rediss://, got {redis_url:?}"
            )));
        }

        Ok(Self {
            host,
            port,
            redis_url,
        })
    }
}
