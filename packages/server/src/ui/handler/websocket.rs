//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    infrastructure::dto::websocket::{ErrorEvent, InboundChatMessage},
    ui::state::{AppState, ConnectQuery},
    usecase::{
        Admission, ConnectError, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        SendMessageUseCase,
    },
};

/// Header carrying the rejection reason of a refused upgrade
pub const ERROR_MESSAGE_HEADER: &str = "X-Error-Message";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Response {
    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Admission runs before the upgrade; rejected connections are never registered
    let connect_usecase = ConnectParticipantUseCase::new(state.rooms.clone(), state.sessions.clone());
    match connect_usecase
        .execute(query.room.as_deref(), query.participant.as_deref(), tx.clone())
        .await
    {
        Ok(admission) => {
            tracing::info!(
                "Participant '{}' connected to room '{}' (session {})",
                admission.participant,
                admission.room,
                admission.session_id
            );
            ws.on_upgrade(move |socket| handle_socket(socket, state, admission, tx, rx))
        }
        Err(e) => {
            tracing::warn!("Rejected WebSocket connection: {}", e);
            reject(e)
        }
    }
}

fn reject(err: ConnectError) -> Response {
    let status = match err {
        ConnectError::MissingParameters => StatusCode::BAD_REQUEST,
        ConnectError::RoomNotFound(_) => StatusCode::NOT_FOUND,
        ConnectError::ParticipantNotMember { .. } => StatusCode::FORBIDDEN,
        ConnectError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let message = err.to_string();
    let header = HeaderValue::from_str(&message);
    let mut response = (status, message).into_response();
    if let Ok(value) = header {
        response.headers_mut().insert(ERROR_MESSAGE_HEADER, value);
    }
    response
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    admission: Admission,
    tx: mpsc::UnboundedSender<String>,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    let room = admission.room.clone();
    let participant = admission.participant.as_str().to_string();
    let state_clone = state.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        let send_usecase = SendMessageUseCase::new(
            state_clone.rooms.clone(),
            state_clone.messages.clone(),
            state_clone.publisher.clone(),
        );

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text from '{}': {}", participant, text);

                    let inbound = match serde_json::from_str::<InboundChatMessage>(&text) {
                        Ok(inbound) => inbound,
                        Err(e) => {
                            tracing::warn!("Failed to parse message as JSON: {}", e);
                            notify_error(&tx, "Invalid message format");
                            continue;
                        }
                    };

                    // Fanout comes back through the broadcast subscriber, sender included
                    if let Err(e) = send_usecase
                        .execute(&room, participant.clone(), inbound.message, None)
                        .await
                    {
                        tracing::warn!("Failed to send message from '{}': {}", participant, e);
                        notify_error(&tx, e.to_string());
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Participant '{}' requested close", participant);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward room messages to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let disconnect_usecase = DisconnectParticipantUseCase::new(state.sessions.clone());
    disconnect_usecase
        .execute(&admission.room, admission.session_id)
        .await;
    tracing::info!(
        "Participant '{}' disconnected from room '{}'",
        admission.participant,
        admission.room
    );
}

fn notify_error(tx: &mpsc::UnboundedSender<String>, message: impl Into<String>) {
    match serde_json::to_string(&ErrorEvent::new(message)) {
        Ok(json) => {
            if tx.send(json).is_err() {
                tracing::debug!("Connection closed before error could be delivered");
            }
        }
        Err(e) => tracing::error!("Failed to serialize error event: {}", e),
    }
}
