use crate::app::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use ladder_core::{PeerId, PlayerInfo, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let peer_id = PeerId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, peer_id, state))
}

async fn handle_socket(socket: WebSocket, peer_id: PeerId, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.signaling.add_peer(peer_id.clone(), tx);
    info!(
        "New WebSocket connection: {}. Total: {}",
        peer_id,
        state.signaling.client_count()
    );

    state.signaling.send(
        &peer_id,
        &SignalMessage::Welcome {
            peer_id: peer_id.clone(),
        },
    );
    state.signaling.send(
        &peer_id,
        &SignalMessage::IceConfig {
            ice_servers: state.signaling.get_ice_servers(),
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();
        let peer_id = peer_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(signal) => dispatch(&state, &peer_id, signal).await,
                        Err(e) => {
                            warn!("Invalid SignalMessage from {}: {}", peer_id, e);
                            state
                                .signaling
                                .send(&peer_id, &SignalMessage::error("Invalid message"));
                        }
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    state.sessions.disconnect(&peer_id).await;
    state.signaling.remove_peer(&peer_id);
    info!(
        "WebSocket disconnected: {}. Remaining: {}",
        peer_id,
        state.signaling.client_count()
    );
}

async fn dispatch(state: &AppState, peer_id: &PeerId, signal: SignalMessage) {
    match signal {
        SignalMessage::CreateSession { .. } => {
            let info = signal
                .requested_player()
                .unwrap_or_else(PlayerInfo::default_host);
            state.sessions.create(peer_id.clone(), info).await;
        }

        SignalMessage::JoinSession {
            ref invite_code, ..
        } => {
            let info = signal
                .requested_player()
                .unwrap_or_else(PlayerInfo::default_guest);
            state
                .sessions
                .join(peer_id.clone(), invite_code, info)
                .await;
        }

        SignalMessage::Ping => state.signaling.send(peer_id, &SignalMessage::Pong),

        SignalMessage::GameMessage { .. }
        | SignalMessage::Offer { .. }
        | SignalMessage::Answer { .. }
        | SignalMessage::IceCandidate { .. } => {
            debug!("Relaying {} from {}", signal.kind(), peer_id);
            state.sessions.relay(peer_id.clone(), signal).await;
        }

        other => warn!("Unexpected {} from {}", other.kind(), peer_id),
    }
}
