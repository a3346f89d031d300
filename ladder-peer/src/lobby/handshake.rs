use crate::channel::{DataChannelLink, GameChannel, RelayLink};
use crate::config::ClientConfig;
use crate::error::PeerError;
use crate::signaling::SignalingClient;
use crate::transport::{LinkEvent, PeerLink, TransportConfig};
use ladder_core::{Seat, SessionId, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;

const LINK_EVENT_CAPACITY: usize = 64;

/// Runs the WebRTC handshake through the relay once both seats are taken,
/// falling back to relaying game messages when allowed.
///
/// A link that does not open in time is closed before falling back, so an
/// opponent whose side did open sees it drop and moves to the relay too.
pub(crate) async fn connect(
    seat: Seat,
    mut signaling: SignalingClient,
    session_id: SessionId,
    config: &ClientConfig,
) -> Result<Box<dyn GameChannel>, PeerError> {
    let mut ice_servers = signaling.ice_servers().to_vec();
    ice_servers.extend(config.ice_servers.iter().cloned());

    let (event_tx, mut events) = mpsc::channel(LINK_EVENT_CAPACITY);
    let link = match PeerLink::new(TransportConfig::new(ice_servers), event_tx).await {
        Ok(link) => link,
        Err(e) => return fall_back(PeerError::Link(e), signaling, session_id, config),
    };

    let mut deferred = Vec::new();
    let attempt = tokio::time::timeout(
        config.connect_timeout,
        establish(seat, &link, &mut events, &mut signaling, session_id, &mut deferred),
    )
    .await;
    signaling.requeue(deferred);

    let failure = match attempt {
        Ok(Ok(channel)) => {
            info!("Direct data channel established");
            let channel = DataChannelLink::new(link, channel, events, signaling, session_id)
                .with_keepalive(config.keepalive_interval);
            return Ok(Box::new(channel));
        }
        Ok(Err(e)) => e,
        Err(_) => PeerError::Timeout("peer connection"),
    };

    if let Err(e) = link.close().await {
        debug!("Closing abandoned peer connection: {:#}", e);
    }
    if matches!(failure, PeerError::OpponentLeft | PeerError::Closed) {
        return Err(failure);
    }
    fall_back(failure, signaling, session_id, config)
}

fn fall_back(
    failure: PeerError,
    signaling: SignalingClient,
    session_id: SessionId,
    config: &ClientConfig,
) -> Result<Box<dyn GameChannel>, PeerError> {
    if !config.relay_fallback {
        return Err(failure);
    }

    warn!("Direct connection unavailable ({}), playing through relay", failure);
    Ok(Box::new(RelayLink::new(signaling, session_id)))
}

async fn establish(
    seat: Seat,
    link: &PeerLink,
    events: &mut mpsc::Receiver<LinkEvent>,
    signaling: &mut SignalingClient,
    session_id: SessionId,
    deferred: &mut Vec<SignalMessage>,
) -> Result<Arc<RTCDataChannel>, PeerError> {
    if seat == Seat::Host {
        let sdp = link.create_offer().await?;
        signaling.send(&SignalMessage::Offer { session_id, sdp })?;
        debug!("Offer sent");
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(LinkEvent::Candidate(init)) => {
                    signaling.send(&SignalMessage::IceCandidate {
                        session_id,
                        candidate: init.candidate,
                        sdp_mid: init.sdp_mid,
                        sdp_m_line_index: init.sdp_mline_index,
                    })?;
                }
                Some(LinkEvent::ChannelOpen(channel)) => return Ok(channel),
                Some(LinkEvent::Disconnected) | None => {
                    return Err(PeerError::Link(anyhow::anyhow!("connection failed during handshake")));
                }
                Some(LinkEvent::Message(_)) => {}
            },

            signal = signaling.recv() => match signal.ok_or(PeerError::Closed)? {
                SignalMessage::Offer { sdp, .. } if seat == Seat::Guest => {
                    let answer = link.accept_offer(sdp).await?;
                    signaling.send(&SignalMessage::Answer { session_id, sdp: answer })?;
                    debug!("Answer sent");
                }
                SignalMessage::Answer { sdp, .. } if seat == Seat::Host => {
                    link.accept_answer(sdp).await?;
                }
                SignalMessage::IceCandidate { candidate, sdp_mid, sdp_m_line_index, .. } => {
                    let init = RTCIceCandidateInit {
                        candidate,
                        sdp_mid,
                        sdp_mline_index: sdp_m_line_index,
                        ..Default::default()
                    };
                    if let Err(e) = link.add_ice_candidate(init).await {
                        warn!("Remote ICE candidate rejected: {:#}", e);
                    }
                }
                SignalMessage::PlayerDisconnected { .. } => return Err(PeerError::OpponentLeft),
                other => deferred.push(other),
            },
        }
    }
}
