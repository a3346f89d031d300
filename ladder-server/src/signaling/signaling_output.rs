use async_trait::async_trait;
use ladder_core::{PeerId, SignalMessage};

/// Outbound half of the relay: how sessions reach connected clients.
///
/// Implemented over websockets by [`crate::SignalingService`]; tests swap in
/// a recorder.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_signal(&self, peer_id: &PeerId, msg: SignalMessage);
}
