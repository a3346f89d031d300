use ladder_core::IceServerConfig;
use webrtc::ice_transport::ice_server::RTCIceServer;

/// ICE setup for a [`PeerLink`](super::PeerLink). Empty means host
/// candidates only, which is enough on one machine or LAN.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl TransportConfig {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self { ice_servers }
    }

    pub(crate) fn rtc_ice_servers(&self) -> Vec<RTCIceServer> {
        self.ice_servers
            .iter()
            .map(|server| RTCIceServer {
                urls: server.urls.clone(),
                username: server.username.clone().unwrap_or_default(),
                credential: server.credential.clone().unwrap_or_default(),
                ..Default::default()
            })
            .collect()
    }
}
