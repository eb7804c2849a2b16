//! Axum WebSocket upgrade handler.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::IntoParams;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::error::{ChatError, ErrorResponse};

/// Query parameters of the join endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JoinParams {
    /// Chat name for this session.
    #[serde(default)]
    pub uname: String,
}

/// `GET /ws?uname=<name>` — Upgrade HTTP connection to WebSocket and join.
///
/// # Errors
///
/// Returns [`ChatError::InvalidRequest`] for a blank name and
/// [`ChatError::DuplicateName`] if the name is already connected.
#[utoipa::path(
    get,
    path = "/ws",
    tag = "Chat",
    summary = "Join the chat room",
    description = "Upgrades to a WebSocket. Every text frame sent is relayed to all connected clients as a `message` event; `join` and `leave` events announce arrivals and departures.",
    params(JoinParams),
    responses(
        (status = 101, description = "Switching protocols"),
        (status = 400, description = "Missing or blank uname", body = ErrorResponse),
        (status = 409, description = "Name already in use", body = ErrorResponse),
    )
)]
pub async fn ws_handler(
    Query(params): Query<JoinParams>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ChatError> {
    let name = params.uname.trim().to_string();
    if name.is_empty() {
        return Err(ChatError::InvalidRequest("uname is required".to_string()));
    }
    // Fast path only; the registry re-checks atomically after the upgrade.
    if state.registry.contains(&name).await {
        return Err(ChatError::DuplicateName(name));
    }

    Ok(ws.on_upgrade(move |socket| run_connection(socket, name, state)))
}
