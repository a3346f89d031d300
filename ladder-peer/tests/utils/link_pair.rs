use anyhow::{Context, Result};
use bytes::Bytes;
use ladder_peer::{LinkEvent, PeerLink, TransportConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use webrtc::data_channel::RTCDataChannel;

/// Timeout for bringing up a local link pair (ms).
pub const LINK_TIMEOUT_MS: u64 = 15000;

pub struct LinkSide {
    pub link: PeerLink,
    pub channel: Arc<RTCDataChannel>,
    pub events: mpsc::Receiver<LinkEvent>,
}

impl LinkSide {
    pub async fn send(&self, data: &[u8]) -> Result<()> {
        self.channel
            .send(&Bytes::from(data.to_vec()))
            .await
            .context("Failed to send on data channel")?;
        Ok(())
    }

    /// Next data frame, skipping other events.
    pub async fn recv_message(&mut self) -> Result<Bytes> {
        let wait = async {
            loop {
                match self.events.recv().await {
                    Some(LinkEvent::Message(bytes)) => return Ok(bytes),
                    Some(_) => continue,
                    None => anyhow::bail!("Link event channel closed"),
                }
            }
        };
        tokio::time::timeout(Duration::from_millis(LINK_TIMEOUT_MS), wait)
            .await
            .context("Timeout waiting for data frame")?
    }

    /// Waits until the link reports it is gone.
    pub async fn wait_disconnected(&mut self) -> Result<()> {
        let wait = async {
            loop {
                match self.events.recv().await {
                    Some(LinkEvent::Disconnected) | None => return,
                    Some(_) => continue,
                }
            }
        };
        tokio::time::timeout(Duration::from_millis(LINK_TIMEOUT_MS), wait)
            .await
            .context("Timeout waiting for disconnect")
    }
}

/// Connects two in-process links, passing SDP and candidates directly
/// instead of through a relay.
pub async fn connect_pair() -> Result<(LinkSide, LinkSide)> {
    let (host_tx, mut host_rx) = mpsc::channel(64);
    let (guest_tx, mut guest_rx) = mpsc::channel(64);

    let host = PeerLink::new(TransportConfig::default(), host_tx).await?;
    let guest = PeerLink::new(TransportConfig::default(), guest_tx).await?;

    let offer = host.create_offer().await?;
    let answer = guest.accept_offer(offer).await?;
    host.accept_answer(answer).await?;

    let mut host_channel = None;
    let mut guest_channel = None;

    let exchange = async {
        while host_channel.is_none() || guest_channel.is_none() {
            tokio::select! {
                Some(event) = host_rx.recv() => match event {
                    LinkEvent::Candidate(init) => guest.add_ice_candidate(init).await?,
                    LinkEvent::ChannelOpen(dc) => host_channel = Some(dc),
                    LinkEvent::Disconnected => anyhow::bail!("Host link failed"),
                    LinkEvent::Message(_) => {}
                },
                Some(event) = guest_rx.recv() => match event {
                    LinkEvent::Candidate(init) => host.add_ice_candidate(init).await?,
                    LinkEvent::ChannelOpen(dc) => guest_channel = Some(dc),
                    LinkEvent::Disconnected => anyhow::bail!("Guest link failed"),
                    LinkEvent::Message(_) => {}
                },
            }
        }
        Ok::<(), anyhow::Error>(())
    };
    tokio::time::timeout(Duration::from_millis(LINK_TIMEOUT_MS), exchange)
        .await
        .context("Timeout connecting link pair")??;

    let host_side = LinkSide {
        link: host,
        channel: host_channel.context("host channel")?,
        events: host_rx,
    };
    let guest_side = LinkSide {
        link: guest,
        channel: guest_channel.context("guest channel")?,
        events: guest_rx,
    };
    Ok((host_side, guest_side))
}
