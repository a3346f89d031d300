use bytes::Bytes;
use std::sync::Arc;
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;

/// Events a [`PeerLink`](super::PeerLink) reports to its owner.
pub enum LinkEvent {
    /// A local ICE candidate to trickle to the other side.
    Candidate(RTCIceCandidateInit),

    /// The game data channel is open and writable.
    ChannelOpen(Arc<RTCDataChannel>),

    /// A binary frame arrived on the data channel.
    Message(Bytes),

    /// The connection failed or was closed.
    Disconnected,
}
