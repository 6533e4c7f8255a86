use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::application::services::DeliveryChannel;
use crate::domain::SessionKey;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListenParams {
    pub session_id: Option<String>,
}

pub async fn listen_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<ListenParams>,
) -> Response {
    let session = SessionKey::from_optional(params.session_id.as_deref());
    let delivery = Arc::clone(&state.delivery);
    ws.on_upgrade(move |socket| handle_listener(socket, delivery, session))
}

async fn handle_listener(socket: WebSocket, delivery: Arc<DeliveryChannel>, session: SessionKey) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let listener_id = delivery.register(session.clone(), tx);
    let (mut outgoing, mut incoming) = socket.split();
    let mut displaced = false;

    tracing::info!(session = %session, "Listener connected");

    loop {
        tokio::select! {
            pushed = rx.recv(), if !displaced => match pushed {
                Some(text) => {
                    if let Err(e) = outgoing.send(Message::Text(text.into())).await {
                        tracing::debug!(error = %e, "Listener send failed");
                        break;
                    }
                }
                // Sender dropped: a newer listener took this session's slot.
                None => displaced = true,
            },
            frame = incoming.next() => match frame {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "Listener transport error");
                    break;
                }
            },
        }
    }

    delivery.unregister(&session, listener_id);
    tracing::info!(session = %session, displaced, "Listener disconnected");
}
