//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, Stream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ConnectionId, Notification},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's channel into the WebSocket sink.
///
/// Every notification for this connection (acks, fan-out, presence) goes
/// through the channel registered with the MessagePusher.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state.open_connection_usecase.execute(connection_id, tx).await;

    let (sender, receiver) = socket.split();
    let (stop_tx, stop_rx) = oneshot::channel();

    let mut recv_task = tokio::spawn(read_loop(state.clone(), connection_id, receiver, stop_rx));
    let mut send_task = pusher_loop(rx, sender);

    // The writer is aborted outright; the reader finishes the event in hand first
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            let _ = stop_tx.send(());
            if let Err(e) = recv_task.await {
                tracing::warn!("Read loop of '{}' ended abnormally: {}", connection_id, e);
            }
        }
    };

    state.close_connection_usecase.execute(&connection_id).await;
}

/// Handle events from one connection in arrival order until the stream ends
/// or `stop` fires.
///
/// `stop` is only observed while waiting for the next frame, so an event
/// that is being handled always runs to completion.
async fn read_loop<S>(
    state: Arc<AppState>,
    connection_id: ConnectionId,
    mut receiver: S,
    mut stop: oneshot::Receiver<()>,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let msg = tokio::select! {
            msg = receiver.next() => msg,
            _ = &mut stop => break,
        };
        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => {
                handle_text(&state, connection_id, text.as_str()).await;
            }
            Message::Binary(_) => {
                tracing::debug!("Ignoring binary frame from '{}'", connection_id);
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            _ => {}
        }
    }
}

async fn handle_text(state: &AppState, connection_id: ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Malformed event from '{}': {}", connection_id, e);
            let rejection = Notification::Rejected {
                event: "unknown".to_string(),
                error: format!("malformed event: {}", e),
            };
            if let Err(e) = state.message_pusher.push_to(&connection_id, &rejection).await {
                tracing::warn!("Failed to reject malformed event: {}", e);
            }
            return;
        }
    };
    tracing::debug!("Received '{}' from '{}'", event.name(), connection_id);

    let outcome = match event {
        ClientEvent::Register(payload) => state
            .register_user_usecase
            .execute(connection_id, payload.user_id)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientEvent::SendMessage(payload) => state
            .send_message_usecase
            .execute(
                connection_id,
                &payload.sender_id,
                payload.recipient_id,
                payload.content,
            )
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientEvent::Typing(payload) => state
            .notify_typing_usecase
            .execute(connection_id, &payload.sender_id, payload.recipient_id)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
    };

    // The use case has already answered the connection
    if let Err(e) = outcome {
        tracing::warn!("Event from '{}' failed: {}", connection_id, e);
    }
}
