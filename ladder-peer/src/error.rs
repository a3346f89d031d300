use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("Signaling connection failed: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Signaling connection closed")]
    Closed,

    #[error("Server refused: {0}")]
    Server(String),

    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),

    #[error("Unexpected {0} from server")]
    Unexpected(&'static str),

    #[error("Opponent left the session")]
    OpponentLeft,

    #[error("Peer connection failed: {0:#}")]
    Link(#[from] anyhow::Error),

    #[error("Invalid game payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid packet: {0}")]
    Packet(#[from] postcard::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{detail} ({status})")]
    Rejected { status: u16, detail: String },
}
