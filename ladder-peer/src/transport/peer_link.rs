use crate::transport::link_event::LinkEvent;
use crate::transport::transport_config::TransportConfig;
use anyhow::{Context, Result};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

pub const GAME_CHANNEL_LABEL: &str = "game";

/// One side of a direct WebRTC connection carrying the game data channel.
///
/// The host calls [`create_offer`](Self::create_offer), which also opens the
/// channel; the guest calls [`accept_offer`](Self::accept_offer) and receives
/// the channel from the host. Everything the connection reports arrives as
/// [`LinkEvent`]s on the sender given to [`new`](Self::new).
pub struct PeerLink {
    peer_connection: Arc<RTCPeerConnection>,
    event_tx: mpsc::Sender<LinkEvent>,
    /// Remote candidates that arrived before the remote description.
    pending_candidates: Mutex<Vec<RTCIceCandidateInit>>,
}

impl PeerLink {
    pub async fn new(config: TransportConfig, event_tx: mpsc::Sender<LinkEvent>) -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config.rtc_ice_servers(),
            ..Default::default()
        };
        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    info!("Peer connection state: {:?}", s);
                    if matches!(
                        s,
                        RTCPeerConnectionState::Failed
                            | RTCPeerConnectionState::Disconnected
                            | RTCPeerConnectionState::Closed
                    ) {
                        let _ = tx.send(LinkEvent::Disconnected).await;
                    }
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                match candidate.to_json() {
                    Ok(init) => {
                        let _ = tx.send(LinkEvent::Candidate(init)).await;
                    }
                    Err(e) => warn!("Dropping local candidate: {}", e),
                }
            })
        }));

        let dc_tx = event_tx.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            Box::pin(async move {
                debug!("Remote opened data channel '{}'", dc.label());
                wire_data_channel(dc, tx);
            })
        }));

        Ok(Self {
            peer_connection,
            event_tx,
            pending_candidates: Mutex::new(Vec::new()),
        })
    }

    /// Host side: opens the game channel and returns the local SDP offer.
    pub async fn create_offer(&self) -> Result<String> {
        let dc = self
            .peer_connection
            .create_data_channel(GAME_CHANNEL_LABEL, None)
            .await
            .context("Failed to create data channel")?;
        wire_data_channel(dc, self.event_tx.clone());

        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .context("Failed to create offer")?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await
            .context("Failed to set local description")?;

        Ok(offer.sdp)
    }

    /// Guest side: applies the host's offer and returns the SDP answer.
    pub async fn accept_offer(&self, sdp: String) -> Result<String> {
        let offer = RTCSessionDescription::offer(sdp)?;
        self.peer_connection
            .set_remote_description(offer)
            .await
            .context("Failed to apply remote offer")?;
        self.flush_pending_candidates().await;

        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .context("Failed to create answer")?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await
            .context("Failed to set local description")?;

        Ok(answer.sdp)
    }

    /// Host side: applies the guest's answer.
    pub async fn accept_answer(&self, sdp: String) -> Result<()> {
        let answer = RTCSessionDescription::answer(sdp)?;
        self.peer_connection
            .set_remote_description(answer)
            .await
            .context("Failed to apply remote answer")?;
        self.flush_pending_candidates().await;
        Ok(())
    }

    pub async fn add_ice_candidate(&self, candidate: RTCIceCandidateInit) -> Result<()> {
        if self.peer_connection.remote_description().await.is_none() {
            self.pending_candidates.lock().await.push(candidate);
            return Ok(());
        }

        self.peer_connection
            .add_ice_candidate(candidate)
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    async fn flush_pending_candidates(&self) {
        let pending: Vec<_> = self.pending_candidates.lock().await.drain(..).collect();
        for candidate in pending {
            if let Err(e) = self.peer_connection.add_ice_candidate(candidate).await {
                warn!("Failed to add buffered ICE candidate: {}", e);
            }
        }
    }

    pub async fn close(&self) -> Result<()> {
        self.peer_connection
            .close()
            .await
            .context("Failed to close peer connection")?;
        Ok(())
    }
}

fn wire_data_channel(dc: Arc<RTCDataChannel>, tx: mpsc::Sender<LinkEvent>) {
    let open_tx = tx.clone();
    let ready = dc.clone();
    dc.on_open(Box::new(move || {
        Box::pin(async move {
            info!("Data channel '{}' open", ready.label());
            let _ = open_tx.send(LinkEvent::ChannelOpen(ready)).await;
        })
    }));

    let msg_tx = tx.clone();
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = msg_tx.clone();
        Box::pin(async move {
            let bytes = Bytes::from(msg.data.to_vec());
            let _ = tx.send(LinkEvent::Message(bytes)).await;
        })
    }));

    dc.on_close(Box::new(move || {
        let tx = tx.clone();
        Box::pin(async move {
            debug!("Data channel closed");
            let _ = tx.send(LinkEvent::Disconnected).await;
        })
    }));
}
