use crate::interface_adapters::net::socket::split_socket;
use crate::interface_adapters::state::AppState;
use crate::use_cases::ServerEvent;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let events_tx = state.server.events_tx.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, events_tx))
}

// Every upgraded socket becomes one arrival; the server loop owns it from here on.
async fn handle_socket(socket: WebSocket, events_tx: mpsc::Sender<ServerEvent>) {
    let transport = split_socket(socket);
    if events_tx
        .send(ServerEvent::Arrival(transport))
        .await
        .is_err()
    {
        // Dropping the transport closes the socket.
        warn!("server loop unavailable; dropping connection");
    }
}
