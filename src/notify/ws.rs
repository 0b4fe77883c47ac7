//! WebSocket surface for admin notifications
//!
//! `GET /notifications/ws?token=<jwt>`. Browsers cannot set headers on a
//! WebSocket handshake, so the JWT travels as a query parameter.

use axum::{
    extract::{Query, State},
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::core::AppState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// Upgrade to WebSocket after validating the query token
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> AppResult<impl IntoResponse> {
    let token = query
        .token
        .ok_or_else(|| AppError::unauthorized("Missing token"))?;
    let claims = state.jwt.validate_token(&token)?;

    tracing::info!(admin = %claims.username, "Admin notification channel connecting");

    Ok(ws.on_upgrade(move |socket| handle_connection(socket, state)))
}

async fn handle_connection(socket: WebSocket, state: AppState) {
    let (id, mut rx) = state.notifier.register();
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(text) => {
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            incoming = stream.next() => match incoming {
                // Inbound frames are ignored; the stream is one-way
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    state.notifier.unregister(id);
}
