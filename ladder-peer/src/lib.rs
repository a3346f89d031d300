mod account;
mod channel;
mod config;
mod error;
mod lobby;
mod signaling;
mod transport;

pub use account::{AccountClient, http_base};
pub use channel::*;
pub use config::ClientConfig;
pub use error::PeerError;
pub use lobby::*;
pub use signaling::SignalingClient;
pub use transport::*;
