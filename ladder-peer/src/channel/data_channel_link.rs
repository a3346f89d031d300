use crate::channel::game_channel::{ChannelEvent, GameChannel};
use crate::error::PeerError;
use crate::signaling::SignalingClient;
use crate::transport::{LinkEvent, PeerLink};
use async_trait::async_trait;
use bytes::Bytes;
use ladder_core::game::GameMessage;
use ladder_core::{Packet, SessionId, SignalMessage, SystemMessage};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;

pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(5);

/// Pings in a row without a pong before the data channel is given up.
const MAX_UNANSWERED_PINGS: u32 = 3;

/// Carries postcard-encoded [`Packet`]s over the WebRTC data channel.
///
/// The relay connection stays open alongside it so that late ICE candidates
/// still flow and a `player_disconnected` from the relay is noticed. If the
/// data channel drops, or stops answering pings, while the relay is still up,
/// game messages continue as relayed `game_message`s.
pub struct DataChannelLink {
    link: PeerLink,
    channel: Arc<RTCDataChannel>,
    events: mpsc::Receiver<LinkEvent>,
    signaling: SignalingClient,
    signaling_open: bool,
    session_id: SessionId,
    /// False once the data channel is abandoned for the relay.
    direct: bool,
    keepalive: Interval,
    unanswered_pings: u32,
    round_trip: Option<Duration>,
}

impl DataChannelLink {
    pub fn new(
        link: PeerLink,
        channel: Arc<RTCDataChannel>,
        events: mpsc::Receiver<LinkEvent>,
        signaling: SignalingClient,
        session_id: SessionId,
    ) -> Self {
        Self {
            link,
            channel,
            events,
            signaling,
            signaling_open: true,
            session_id,
            direct: true,
            keepalive: keepalive_interval(DEFAULT_KEEPALIVE),
            unanswered_pings: 0,
            round_trip: None,
        }
    }

    /// Pings the opponent every `period` while the data channel is in use.
    pub fn with_keepalive(mut self, period: Duration) -> Self {
        self.keepalive = keepalive_interval(period);
        self
    }

    /// Latest ping round trip over the data channel.
    pub fn round_trip(&self) -> Option<Duration> {
        self.round_trip
    }

    /// Whether messages still go over the data channel.
    pub fn is_direct(&self) -> bool {
        self.direct
    }

    async fn send_packet(&self, packet: &Packet<GameMessage>) -> Result<(), PeerError> {
        let bytes = packet.encode()?;
        self.channel
            .send(&Bytes::from(bytes))
            .await
            .map_err(|e| PeerError::Link(e.into()))?;
        Ok(())
    }

    async fn send_relayed(&self, msg: &GameMessage) -> Result<(), PeerError> {
        let data = serde_json::to_value(msg)?;
        self.signaling.send(&SignalMessage::GameMessage {
            session_id: self.session_id,
            data,
        })
    }

    /// Stops using the data channel. Returns the event for the caller when
    /// there is no relay left to carry on over.
    fn drop_direct(&mut self, reason: &str) -> Option<ChannelEvent> {
        if !self.signaling_open {
            return Some(ChannelEvent::OpponentLeft);
        }
        if self.direct {
            warn!("Data channel lost ({}), continuing through relay", reason);
            self.direct = false;
        }
        None
    }

    async fn ping(&mut self) -> Option<ChannelEvent> {
        if self.unanswered_pings >= MAX_UNANSWERED_PINGS {
            return self.drop_direct("no pong");
        }

        let timestamp = unix_millis();
        self.unanswered_pings += 1;
        if let Err(e) = self.send_packet(&Packet::System(SystemMessage::Ping { timestamp })).await {
            debug!("Ping not sent: {}", e);
        }
        None
    }

    /// Returns an event for the caller, or `None` if the frame was internal.
    async fn handle_frame(&mut self, bytes: &[u8]) -> Option<ChannelEvent> {
        match Packet::<GameMessage>::decode(bytes) {
            Ok(Packet::User(msg)) => Some(ChannelEvent::Game(msg)),
            Ok(Packet::System(SystemMessage::Ping { timestamp })) => {
                let pong = Packet::System(SystemMessage::Pong { timestamp });
                if let Err(e) = self.send_packet(&pong).await {
                    error!("Failed to answer ping: {}", e);
                }
                None
            }
            Ok(Packet::System(SystemMessage::Pong { timestamp })) => {
                self.unanswered_pings = 0;
                let rtt = Duration::from_millis(unix_millis().saturating_sub(timestamp));
                debug!("Data channel round trip {:?}", rtt);
                self.round_trip = Some(rtt);
                None
            }
            Ok(Packet::System(SystemMessage::Goodbye)) => Some(ChannelEvent::OpponentLeft),
            Err(e) => {
                warn!("Dropping undecodable frame ({} bytes): {}", bytes.len(), e);
                None
            }
        }
    }

    async fn handle_signal(&mut self, signal: Option<SignalMessage>) -> Option<ChannelEvent> {
        match signal {
            Some(SignalMessage::PlayerDisconnected { .. }) => Some(ChannelEvent::OpponentLeft),
            // The opponent gave up on the direct link and plays through the relay.
            Some(SignalMessage::GameMessage { session_id, data }) if session_id == self.session_id => {
                match serde_json::from_value(data) {
                    Ok(msg) => Some(ChannelEvent::Game(msg)),
                    Err(e) => {
                        warn!("Ignoring malformed game message: {}", e);
                        None
                    }
                }
            }
            Some(SignalMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_m_line_index,
                ..
            }) => {
                let init = RTCIceCandidateInit {
                    candidate,
                    sdp_mid,
                    sdp_mline_index: sdp_m_line_index,
                    ..Default::default()
                };
                if let Err(e) = self.link.add_ice_candidate(init).await {
                    warn!("Late ICE candidate rejected: {:#}", e);
                }
                None
            }
            Some(other) => {
                debug!("Direct link ignoring {}", other.kind());
                None
            }
            None if self.direct => {
                debug!("Relay connection closed, continuing on data channel");
                self.signaling_open = false;
                None
            }
            None => {
                self.signaling_open = false;
                Some(ChannelEvent::OpponentLeft)
            }
        }
    }
}

#[async_trait]
impl GameChannel for DataChannelLink {
    async fn send(&mut self, msg: &GameMessage) -> Result<(), PeerError> {
        if self.direct {
            self.send_packet(&Packet::User(*msg)).await
        } else {
            self.send_relayed(msg).await
        }
    }

    async fn recv(&mut self) -> Option<ChannelEvent> {
        loop {
            tokio::select! {
                event = self.events.recv(), if self.direct => {
                    let Some(event) = event else {
                        if let Some(event) = self.drop_direct("link events ended") {
                            return Some(event);
                        }
                        continue;
                    };
                    match event {
                        LinkEvent::Message(bytes) => {
                            if let Some(event) = self.handle_frame(&bytes).await {
                                return Some(event);
                            }
                        }
                        LinkEvent::Candidate(init) => {
                            let _ = self.signaling.send(&SignalMessage::IceCandidate {
                                session_id: self.session_id,
                                candidate: init.candidate,
                                sdp_mid: init.sdp_mid,
                                sdp_m_line_index: init.sdp_mline_index,
                            });
                        }
                        LinkEvent::Disconnected => {
                            if let Some(event) = self.drop_direct("disconnected") {
                                return Some(event);
                            }
                        }
                        LinkEvent::ChannelOpen(_) => {}
                    }
                }

                signal = self.signaling.recv(), if self.signaling_open => {
                    if let Some(event) = self.handle_signal(signal).await {
                        return Some(event);
                    }
                }

                _ = self.keepalive.tick(), if self.direct => {
                    if let Some(event) = self.ping().await {
                        return Some(event);
                    }
                }

                else => return None,
            }
        }
    }

    fn transport(&self) -> &'static str {
        if self.direct { "direct" } else { "relay" }
    }

    async fn close(&mut self) {
        if self.direct {
            if let Err(e) = self.send_packet(&Packet::System(SystemMessage::Goodbye)).await {
                debug!("Goodbye not delivered: {}", e);
            }
        }
        if let Err(e) = self.link.close().await {
            warn!("{:#}", e);
        }
        self.signaling.close();
        info!("Game channel closed");
    }
}

fn keepalive_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}
