use crate::model::peer::PeerId;
use crate::model::player::PlayerInfo;
use crate::model::session::{InviteCode, SessionId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// JSON envelope spoken over the relay websocket, in both directions.
///
/// Negotiation messages (`offer`, `answer`, `ice_candidate`) and
/// `game_message` carry the session they belong to; the relay forwards them
/// unchanged to the other seat of that session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalMessage {
    // client -> server
    CreateSession {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_avatar: Option<String>,
    },
    JoinSession {
        invite_code: InviteCode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_avatar: Option<String>,
    },
    Ping,

    // either direction, relayed
    GameMessage {
        session_id: SessionId,
        data: serde_json::Value,
    },
    Offer {
        session_id: SessionId,
        sdp: String,
    },
    Answer {
        session_id: SessionId,
        sdp: String,
    },
    IceCandidate {
        session_id: SessionId,
        candidate: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_mid: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_m_line_index: Option<u16>,
    },

    // server -> client
    Welcome {
        peer_id: PeerId,
    },
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    SessionCreated {
        session_id: SessionId,
        invite_code: InviteCode,
    },
    PlayerJoined {
        guest_info: PlayerInfo,
    },
    SessionJoined {
        session_id: SessionId,
        host_info: PlayerInfo,
    },
    GameReady {
        session_id: SessionId,
    },
    PlayerDisconnected {
        session_id: SessionId,
    },
    Error {
        message: String,
    },
    Pong,
}

impl SignalMessage {
    pub fn error(message: impl Into<String>) -> Self {
        SignalMessage::Error {
            message: message.into(),
        }
    }

    /// Wire tag of this message, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalMessage::CreateSession { .. } => "create_session",
            SignalMessage::JoinSession { .. } => "join_session",
            SignalMessage::Ping => "ping",
            SignalMessage::GameMessage { .. } => "game_message",
            SignalMessage::Offer { .. } => "offer",
            SignalMessage::Answer { .. } => "answer",
            SignalMessage::IceCandidate { .. } => "ice_candidate",
            SignalMessage::Welcome { .. } => "welcome",
            SignalMessage::IceConfig { .. } => "ice_config",
            SignalMessage::SessionCreated { .. } => "session_created",
            SignalMessage::PlayerJoined { .. } => "player_joined",
            SignalMessage::SessionJoined { .. } => "session_joined",
            SignalMessage::GameReady { .. } => "game_ready",
            SignalMessage::PlayerDisconnected { .. } => "player_disconnected",
            SignalMessage::Error { .. } => "error",
            SignalMessage::Pong => "pong",
        }
    }

    /// Session this message must be relayed within, if it is a relayed kind.
    pub fn relay_session(&self) -> Option<SessionId> {
        match self {
            SignalMessage::GameMessage { session_id, .. }
            | SignalMessage::Offer { session_id, .. }
            | SignalMessage::Answer { session_id, .. }
            | SignalMessage::IceCandidate { session_id, .. } => Some(*session_id),
            _ => None,
        }
    }

    /// Player info carried by a create or join request, with the seat defaults
    /// applied to missing fields.
    pub fn requested_player(&self) -> Option<PlayerInfo> {
        let (name, avatar, fallback) = match self {
            SignalMessage::CreateSession {
                player_name,
                player_avatar,
            } => (player_name, player_avatar, PlayerInfo::default_host()),
            SignalMessage::JoinSession {
                player_name,
                player_avatar,
                ..
            } => (player_name, player_avatar, PlayerInfo::default_guest()),
            _ => return None,
        };

        Some(PlayerInfo {
            name: name.clone().unwrap_or(fallback.name),
            avatar: avatar.clone().unwrap_or(fallback.avatar),
        })
    }
}
