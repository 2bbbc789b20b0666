//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory},
    ui::{event_router::EventRouter, state::AppState},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // 接続ごとに一意な ID を払い出す
    let connection_id = ConnectionIdFactory::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Everything the event router emits for this connection (caller-only replies and
/// room broadcasts) arrives through `rx`.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns the task that feeds inbound frames to the event router, one at a time.
///
/// This task is never aborted: it ends once every frame queued in `inbound` has been
/// handled and the sending side is gone, so an event that has started always
/// reaches its emit step.
fn dispatch_loop(
    event_router: Arc<EventRouter>,
    connection_id: ConnectionId,
    mut inbound: mpsc::UnboundedReceiver<String>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(text) = inbound.recv().await {
            event_router.handle_text(&connection_id, &text).await;
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive events
    let (tx, rx) = mpsc::unbounded_channel();
    state.event_router.connect(connection_id.clone(), tx).await;
    tracing::info!("Connection '{}' opened", connection_id);

    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();
    let dispatch_task = dispatch_loop(
        state.event_router.clone(),
        connection_id.clone(),
        inbound_rx,
    );

    let connection_id_clone = connection_id.clone();

    // Spawn a task to read frames from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if inbound_tx.send(text.as_str().to_string()).is_err() {
                        break;
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward emitted events to this connection
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other.
    // Aborting `recv_task` only stops reading; frames already queued are still dispatched.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = dispatch_task.await {
        tracing::error!("Dispatch task for '{}' failed: {}", connection_id, e);
    }
    state.event_router.disconnect(&connection_id).await;
    tracing::info!("Connection '{}' closed", connection_id);
}
