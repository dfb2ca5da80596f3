//! Change-notification stream. Clients hold a socket open and re-fetch when
//! an `entry_changed` event for their user id arrives; the server pushes no
//! entry data over the socket itself.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: Option<String>,
}

/// GET /ws?token=... — browsers cannot set an Authorization header on
/// WebSocket upgrades, so the session token rides in the query string.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
) -> Response {
    let user_id = match authenticate_ws(&state, query.token.as_deref()) {
        Ok(id) => id,
        Err(reason) => {
            tracing::warn!(reason, "WebSocket auth failed");
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

fn authenticate_ws(state: &AppState, token: Option<&str>) -> Result<Uuid, &'static str> {
    let token = token.ok_or("missing token query parameter")?;
    let token_data = verify_token(token, &state.config).map_err(|_| "invalid or expired token")?;
    Ok(token_data.claims.sub)
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: Uuid) {
    let (mut sender, mut receiver) = socket.split();

    tracing::debug!(user_id = %user_id, "WebSocket connection established");

    let mut rx = state
        .ws_tx
        .as_ref()
        .map(|tx| tx.subscribe())
        .expect("WebSocket broadcast channel not initialized");

    // Forward events tagged with this user's id; drop everything else.
    let mut send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            let for_this_user = serde_json::from_str::<serde_json::Value>(&msg)
                .ok()
                .and_then(|v| {
                    v.get("user_id")
                        .and_then(|id| id.as_str())
                        .map(|id| id == user_id.to_string())
                })
                .unwrap_or(false);
            if !for_this_user {
                continue;
            }
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    // The stream is one-way; the client only ever sends a close frame.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::debug!(user_id = %user_id, "WebSocket connection closed");
}
