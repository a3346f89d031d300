use crate::session::session_command::{JoinRejection, SessionCommand};
use crate::signaling::SignalingOutput;
use ladder_core::{PeerId, PlayerInfo, Seat, SessionId, SignalMessage};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Sleep;
use tracing::{debug, info, warn};

struct Member {
    peer_id: PeerId,
    info: PlayerInfo,
}

/// One two-seat game session. Owns its membership and forwards negotiation
/// and game traffic between the seats; it never inspects the payloads.
pub struct Session {
    id: SessionId,
    host: Member,
    guest: Option<Member>,
    command_rx: mpsc::Receiver<SessionCommand>,
    signaling: Arc<dyn SignalingOutput>,
    ready_delay: Duration,
    ready_timer: Option<Pin<Box<Sleep>>>,
}

impl Session {
    pub fn new(
        id: SessionId,
        host: PeerId,
        host_info: PlayerInfo,
        command_rx: mpsc::Receiver<SessionCommand>,
        signaling: Arc<dyn SignalingOutput>,
        ready_delay: Duration,
    ) -> Self {
        Self {
            id,
            host: Member {
                peer_id: host,
                info: host_info,
            },
            guest: None,
            command_rx,
            signaling,
            ready_delay,
            ready_timer: None,
        }
    }

    pub async fn run(mut self) {
        info!("Session {} event loop started", self.id.invite_code());

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => {
                            if !self.handle_command(c).await {
                                break;
                            }
                        }
                        None => {
                            info!("Command channel closed. Shutting down session.");
                            break;
                        }
                    }
                }

                _ = ready_elapsed(&mut self.ready_timer) => {
                    self.ready_timer = None;
                    self.announce_ready().await;
                }
            }
        }

        info!("Session {} event loop finished", self.id.invite_code());
    }

    /// Returns `false` once the session is over.
    async fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Join {
                peer_id,
                info,
                reply,
            } => {
                let outcome = self.admit(peer_id, info).await;
                let _ = reply.send(outcome);
                true
            }

            SessionCommand::Relay { from, message } => {
                self.relay(from, message).await;
                true
            }

            SessionCommand::Disconnect { peer_id } => self.handle_disconnect(&peer_id).await,
        }
    }

    async fn admit(&mut self, peer_id: PeerId, info: PlayerInfo) -> Result<(), JoinRejection> {
        if peer_id == self.host.peer_id {
            return Err(JoinRejection::AlreadyHost);
        }
        if self.guest.is_some() {
            return Err(JoinRejection::Full);
        }

        info!("{} joined session {}", info.name, self.id.invite_code());

        self.signaling
            .send_signal(
                &self.host.peer_id,
                SignalMessage::PlayerJoined {
                    guest_info: info.clone(),
                },
            )
            .await;
        self.signaling
            .send_signal(
                &peer_id,
                SignalMessage::SessionJoined {
                    session_id: self.id,
                    host_info: self.host.info.clone(),
                },
            )
            .await;

        self.guest = Some(Member { peer_id, info });
        self.ready_timer = Some(Box::pin(tokio::time::sleep(self.ready_delay)));
        Ok(())
    }

    async fn announce_ready(&self) {
        let Some(guest) = &self.guest else {
            return;
        };
        let ready = SignalMessage::GameReady {
            session_id: self.id,
        };
        self.signaling
            .send_signal(&self.host.peer_id, ready.clone())
            .await;
        self.signaling.send_signal(&guest.peer_id, ready).await;
        info!("Game ready in session {}", self.id.invite_code());
    }

    fn seat_of(&self, peer_id: &PeerId) -> Option<Seat> {
        if *peer_id == self.host.peer_id {
            Some(Seat::Host)
        } else if self
            .guest
            .as_ref()
            .is_some_and(|g| g.peer_id == *peer_id)
        {
            Some(Seat::Guest)
        } else {
            None
        }
    }

    fn peer_at(&self, seat: Seat) -> Option<&PeerId> {
        match seat {
            Seat::Host => Some(&self.host.peer_id),
            Seat::Guest => self.guest.as_ref().map(|g| &g.peer_id),
        }
    }

    async fn relay(&self, from: PeerId, message: SignalMessage) {
        let Some(seat) = self.seat_of(&from) else {
            warn!("{} tried to relay into session {} without a seat", from, self.id);
            self.signaling
                .send_signal(&from, SignalMessage::error("Not a member of this session"))
                .await;
            return;
        };

        let Some(target) = self.peer_at(seat.other()) else {
            debug!("No {} in session {} yet, dropping relay", seat.other(), self.id);
            return;
        };

        self.signaling.send_signal(target, message).await;
    }

    async fn handle_disconnect(&mut self, peer_id: &PeerId) -> bool {
        let Some(seat) = self.seat_of(peer_id) else {
            debug!("Ignoring disconnect of non-member {}", peer_id);
            return true;
        };

        info!("The {} left session {}", seat, self.id.invite_code());

        if let Some(other) = self.peer_at(seat.other()) {
            self.signaling
                .send_signal(
                    other,
                    SignalMessage::PlayerDisconnected {
                        session_id: self.id,
                    },
                )
                .await;
        }
        false
    }
}

async fn ready_elapsed(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}
