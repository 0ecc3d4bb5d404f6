//! HTTP API for the Telegram Mini App
//!
//! A small read-only JSON API next to the bot:
//! - `GET /` liveness banner
//! - `GET /users/{tg_id}` public profile of a user
//! - `GET /health` database reachability

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::{info, error};
use crate::database::DatabaseService;
use crate::models::user::UserProfile;
use crate::utils::errors::Result;

/// Shared state of the API handlers
#[derive(Debug, Clone)]
pub struct ApiState {
    pub database: DatabaseService,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(api_root))
        .route("/users/{tg_id}", get(api_user))
        .route("/health", get(api_health))
        .with_state(state)
}

/// Serve the API on `addr` until `shutdown` resolves
pub async fn serve<F>(addr: SocketAddr, state: Arc<ApiState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Mini App API listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Mini App API stopped");
    Ok(())
}

async fn api_root() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "msg": "Mini App API is running!" }))
}

async fn api_user(Path(tg_id): Path<i64>, State(state): State<Arc<ApiState>>) -> Response {
    match state.database.users.find_by_telegram_id(tg_id).await {
        Ok(Some(user)) => Json(UserProfile::from(&user)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(telegram_id = tg_id, error = %e, "Profile lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal error" })),
            )
                .into_response()
        }
    }
}

async fn api_health(State(state): State<Arc<ApiState>>) -> (StatusCode, Json<serde_json::Value>) {
    let database = state.database.is_healthy().await;
    let status = if database { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    let label = if database { "ok" } else { "degraded" };

    (status, Json(json!({ "status": label, "database": database })))
}
