//! WebSocket connection handler

use crate::models::ClientMessage;
use crate::state::AppState;
use crate::websocket::events::WsConnection;
use arena_core::ArenaEvent;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Agent the client is driving, if any
    pub agent_id: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<WsQuery>,
) -> Response {
    let conn_id = Uuid::new_v4();
    ws.on_upgrade(move |socket| handle_socket(socket, state, conn_id, query))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, conn_id: Uuid, query: WsQuery) {
    let (mut sender, mut receiver) = socket.split();

    state.broadcaster.add_connection(WsConnection {
        id: conn_id,
        agent_id: query.agent_id.clone(),
    });
    info!("WebSocket connected: {} (agent: {:?})", conn_id, query.agent_id);

    // fresh snapshots so a late joiner doesn't start blind
    let snapshots = [
        ArenaEvent::AgentsUpdate(state.registry.list()),
        ArenaEvent::LeaderboardUpdate(state.registry.leaderboard()),
    ];
    for event in snapshots {
        if let Ok(json) = serde_json::to_string(&event) {
            if sender.send(Message::Text(json)).await.is_err() {
                state.broadcaster.remove_connection(&conn_id);
                return;
            }
        }
    }

    let mut event_rx = state.broadcaster.subscribe();

    let send_task = tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            warn!("failed to serialize {}: {}", event.name(), e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    warn!("WebSocket {} lagged by {} events", conn_id, n);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let state_clone = state.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    handle_client_message(&state_clone, conn_id, &text);
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    info!("WebSocket {} closed by client", conn_id);
                    break;
                }
                Err(e) => {
                    warn!("WebSocket error for {}: {}", conn_id, e);
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    state.broadcaster.remove_connection(&conn_id);
    info!("WebSocket disconnected: {}", conn_id);
}

fn handle_client_message(state: &AppState, conn_id: Uuid, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::BattleAction(req)) => {
            state
                .engine
                .handle_action(req.battle_id, &req.agent_id, req.action);
        }
        Ok(ClientMessage::Ping) => {
            debug!("ping from {}", conn_id);
        }
        Ok(ClientMessage::Other) => {
            debug!("unhandled message from {}: {}", conn_id, text);
        }
        Err(e) => {
            warn!("invalid message from {}: {}", conn_id, e);
        }
    }
}
