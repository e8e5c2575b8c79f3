pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod extract;
pub mod messages;
pub mod notifications;
pub mod pages;
pub mod res;
pub mod session;
pub mod users;

use axum::{debug_handler, extract::{DefaultBodyLimit, FromRef}, routing::get, Json, Router};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

pub use appresult::{AppError, AppResult};
pub use config::Config;

const BODY_LIMIT: usize = 5 * 1024 * 1024;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
}

pub fn app(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(hello))
        .merge(pages::router())

        .nest("/api/auth", auth::router())
        .nest("/api/user", users::router())
        .nest("/api/notification", notifications::router())
        .nest("/api/messages", messages::router())

        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(session::layer(config))
        .layer(CorsLayer::permissive())
}

#[debug_handler]
async fn hello() -> Json<Value> {
    Json(json!({ "success": true, "message": "chirp is up" }))
}
