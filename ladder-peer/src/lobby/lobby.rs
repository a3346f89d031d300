use crate::config::ClientConfig;
use crate::error::PeerError;
use crate::lobby::handshake;
use crate::lobby::matched::Match;
use crate::signaling::SignalingClient;
use ladder_core::{InviteCode, PlayerInfo, Seat, SessionId, SignalMessage};
use tracing::info;

/// Entry point for multiplayer: hosts or joins a session on the relay and
/// turns it into a connected [`Match`].
pub struct Lobby {
    config: ClientConfig,
}

impl Lobby {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Opens a session and returns its invite code together with a handle
    /// that waits for the guest.
    pub async fn host(&self, profile: &PlayerInfo) -> Result<(InviteCode, PendingMatch), PeerError> {
        let mut signaling = self.connect_relay().await?;
        signaling.send(&SignalMessage::CreateSession {
            player_name: Some(profile.name.clone()),
            player_avatar: Some(profile.avatar.clone()),
        })?;

        let created = signaling
            .expect_within(self.config.signal_timeout, "session_created", |m| {
                matches!(m, SignalMessage::SessionCreated { .. })
            })
            .await?;
        let SignalMessage::SessionCreated {
            session_id,
            invite_code,
        } = created
        else {
            return Err(PeerError::Unexpected(created.kind()));
        };

        info!("Hosting session {}", invite_code);
        let pending = PendingMatch {
            config: self.config.clone(),
            signaling,
            session_id,
        };
        Ok((invite_code, pending))
    }

    /// Joins the session behind `code` and connects to its host.
    pub async fn join(&self, code: &InviteCode, profile: &PlayerInfo) -> Result<Match, PeerError> {
        let mut signaling = self.connect_relay().await?;
        signaling.send(&SignalMessage::JoinSession {
            invite_code: code.clone(),
            player_name: Some(profile.name.clone()),
            player_avatar: Some(profile.avatar.clone()),
        })?;

        let joined = signaling
            .expect_within(self.config.signal_timeout, "session_joined", |m| {
                matches!(m, SignalMessage::SessionJoined { .. })
            })
            .await?;
        let SignalMessage::SessionJoined {
            session_id,
            host_info,
        } = joined
        else {
            return Err(PeerError::Unexpected(joined.kind()));
        };
        info!("Joined {}'s session {}", host_info.name, code);

        wait_ready(&mut signaling, self.config.signal_timeout).await?;
        let channel = handshake::connect(Seat::Guest, signaling, session_id, &self.config).await?;

        Ok(Match {
            seat: Seat::Guest,
            opponent: host_info,
            session_id,
            channel,
        })
    }

    async fn connect_relay(&self) -> Result<SignalingClient, PeerError> {
        SignalingClient::connect(&self.config.server_url, self.config.signal_timeout).await
    }
}

/// A hosted session still waiting for its guest.
pub struct PendingMatch {
    config: ClientConfig,
    signaling: SignalingClient,
    session_id: SessionId,
}

impl PendingMatch {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Waits, without a deadline, for a guest to join and then connects.
    pub async fn wait(mut self) -> Result<Match, PeerError> {
        let joined = self
            .signaling
            .expect(|m| matches!(m, SignalMessage::PlayerJoined { .. }))
            .await?;
        let SignalMessage::PlayerJoined { guest_info } = joined else {
            return Err(PeerError::Unexpected(joined.kind()));
        };
        info!("{} joined", guest_info.name);

        wait_ready(&mut self.signaling, self.config.signal_timeout).await?;
        let channel =
            handshake::connect(Seat::Host, self.signaling, self.session_id, &self.config).await?;

        Ok(Match {
            seat: Seat::Host,
            opponent: guest_info,
            session_id: self.session_id,
            channel,
        })
    }
}

async fn wait_ready(
    signaling: &mut SignalingClient,
    timeout: std::time::Duration,
) -> Result<(), PeerError> {
    let msg = signaling
        .expect_within(timeout, "game_ready", |m| {
            matches!(
                m,
                SignalMessage::GameReady { .. } | SignalMessage::PlayerDisconnected { .. }
            )
        })
        .await?;

    match msg {
        SignalMessage::GameReady { .. } => Ok(()),
        _ => Err(PeerError::OpponentLeft),
    }
}
