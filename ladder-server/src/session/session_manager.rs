use crate::session::session::Session;
use crate::session::session_command::{JoinRejection, SessionCommand};
use crate::signaling::SignalingOutput;
use dashmap::DashMap;
use ladder_core::{InviteCode, PeerId, PlayerInfo, SessionId, SignalMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

const SESSION_CHANNEL_CAPACITY: usize = 100;

/// Directory of live sessions: spawns session actors, resolves invite codes
/// and remembers which session each connected peer sits in.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<DashMap<SessionId, mpsc::Sender<SessionCommand>>>,
    invites: Arc<DashMap<InviteCode, SessionId>>,
    memberships: Arc<DashMap<PeerId, SessionId>>,
    signaling: Arc<dyn SignalingOutput>,
    ready_delay: Duration,
}

impl SessionManager {
    pub fn new(signaling: Arc<dyn SignalingOutput>, ready_delay: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            invites: Arc::new(DashMap::new()),
            memberships: Arc::new(DashMap::new()),
            signaling,
            ready_delay,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session_of(&self, peer_id: &PeerId) -> Option<SessionId> {
        self.memberships.get(peer_id).map(|entry| *entry.value())
    }

    pub fn lookup(&self, code: &InviteCode) -> Option<SessionId> {
        self.invites.get(code).map(|entry| *entry.value())
    }

    /// Opens a new session with `host` in the host seat and replies with its
    /// invite code.
    pub async fn create(&self, host: PeerId, info: PlayerInfo) -> SessionId {
        self.leave_current(&host).await;

        let session_id = SessionId::new();
        let invite_code = session_id.invite_code();
        let (tx, rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);

        let session = Session::new(
            session_id,
            host.clone(),
            info,
            rx,
            self.signaling.clone(),
            self.ready_delay,
        );

        self.sessions.insert(session_id, tx);
        self.invites.insert(invite_code.clone(), session_id);
        self.memberships.insert(host.clone(), session_id);

        let manager = self.clone();
        tokio::spawn(async move {
            session.run().await;
            manager.forget(session_id);
        });

        info!("Session {} created", invite_code);
        self.signaling
            .send_signal(
                &host,
                SignalMessage::SessionCreated {
                    session_id,
                    invite_code,
                },
            )
            .await;

        session_id
    }

    pub async fn join(&self, peer_id: PeerId, code: &InviteCode, info: PlayerInfo) {
        let Some((session_id, tx)) = self
            .lookup(code)
            .and_then(|id| self.sessions.get(&id).map(|tx| (id, tx.clone())))
        else {
            debug!("{} asked for unknown invite {}", peer_id, code);
            self.signaling
                .send_signal(&peer_id, SignalMessage::error("Session not found"))
                .await;
            return;
        };

        if self.session_of(&peer_id) != Some(session_id) {
            self.leave_current(&peer_id).await;
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        let cmd = SessionCommand::Join {
            peer_id: peer_id.clone(),
            info,
            reply: reply_tx,
        };
        if let Err(e) = tx.send(cmd).await {
            error!("Session {} died: {}", session_id, e);
            self.signaling
                .send_signal(&peer_id, SignalMessage::error("Session not found"))
                .await;
            return;
        }

        match reply_rx.await {
            Ok(Ok(())) => {
                self.memberships.insert(peer_id, session_id);
            }
            Ok(Err(rejection)) => {
                self.signaling
                    .send_signal(&peer_id, SignalMessage::error(rejection.message()))
                    .await;
            }
            Err(_) => {
                self.signaling
                    .send_signal(&peer_id, SignalMessage::error("Session not found"))
                    .await;
            }
        }
    }

    /// Passes a negotiation or game message to the session it names.
    pub async fn relay(&self, from: PeerId, message: SignalMessage) {
        let Some(session_id) = message.relay_session() else {
            return;
        };
        let Some(tx) = self.sessions.get(&session_id).map(|tx| tx.clone()) else {
            debug!("Dropping relay for unknown session {}", session_id);
            return;
        };

        let _ = tx.send(SessionCommand::Relay { from, message }).await;
    }

    pub async fn disconnect(&self, peer_id: &PeerId) {
        self.leave_current(peer_id).await;
    }

    async fn leave_current(&self, peer_id: &PeerId) {
        let Some((_, session_id)) = self.memberships.remove(peer_id) else {
            return;
        };
        let Some(tx) = self.sessions.get(&session_id).map(|tx| tx.clone()) else {
            return;
        };

        let _ = tx
            .send(SessionCommand::Disconnect {
                peer_id: peer_id.clone(),
            })
            .await;
    }

    fn forget(&self, session_id: SessionId) {
        self.sessions.remove(&session_id);
        self.invites.remove(&session_id.invite_code());
        self.memberships.retain(|_, id| *id != session_id);
    }
}
