use crate::error::PeerError;
use futures::{SinkExt, StreamExt};
use ladder_core::{IceServerConfig, PeerId, SignalMessage};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Client side of the relay websocket.
///
/// A writer task drains an outgoing queue into the socket and a reader task
/// parses incoming frames into [`SignalMessage`]s. Messages skipped by
/// [`expect`](Self::expect) are kept and handed out by later `recv` calls.
pub struct SignalingClient {
    peer_id: PeerId,
    ice_servers: Vec<IceServerConfig>,
    outgoing: mpsc::UnboundedSender<Message>,
    incoming: mpsc::UnboundedReceiver<SignalMessage>,
    stash: VecDeque<SignalMessage>,
    reader: JoinHandle<()>,
}

impl SignalingClient {
    /// Connects and waits for the `welcome` / `ice_config` greeting.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, PeerError> {
        let (stream, _) = tokio::time::timeout(timeout, connect_async(url))
            .await
            .map_err(|_| PeerError::Timeout("relay connection"))??;
        let (mut sink, mut source) = stream.split();

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let closing = matches!(msg, Message::Close(_));
                if let Err(e) = sink.send(msg).await {
                    debug!("Signaling writer stopped: {}", e);
                    break;
                }
                if closing {
                    break;
                }
            }
        });

        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(async move {
            while let Some(Ok(frame)) = source.next().await {
                match frame {
                    Message::Text(text) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(msg) => {
                            if in_tx.send(msg).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Ignoring malformed signal: {}", e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        });

        let mut client = Self {
            peer_id: PeerId::new(),
            ice_servers: Vec::new(),
            outgoing: out_tx,
            incoming: in_rx,
            stash: VecDeque::new(),
            reader,
        };

        match client.recv_timeout(timeout, "welcome").await? {
            SignalMessage::Welcome { peer_id } => client.peer_id = peer_id,
            other => return Err(PeerError::Unexpected(other.kind())),
        }
        let SignalMessage::IceConfig { ice_servers } = client
            .expect_within(timeout, "ice_config", |m| {
                matches!(m, SignalMessage::IceConfig { .. })
            })
            .await?
        else {
            return Err(PeerError::Unexpected("message"));
        };
        client.ice_servers = ice_servers;

        info!("Connected to relay {} as {}", url, client.peer_id);
        Ok(client)
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    /// ICE servers announced by the relay.
    pub fn ice_servers(&self) -> &[IceServerConfig] {
        &self.ice_servers
    }

    pub fn send(&self, msg: &SignalMessage) -> Result<(), PeerError> {
        let json = serde_json::to_string(msg)?;
        self.outgoing
            .send(Message::text(json))
            .map_err(|_| PeerError::Closed)
    }

    /// Next message; `None` once the connection is gone.
    pub async fn recv(&mut self) -> Option<SignalMessage> {
        match self.stash.pop_front() {
            Some(msg) => Some(msg),
            None => self.incoming.recv().await,
        }
    }

    pub async fn recv_timeout(
        &mut self,
        timeout: Duration,
        what: &'static str,
    ) -> Result<SignalMessage, PeerError> {
        tokio::time::timeout(timeout, self.recv())
            .await
            .map_err(|_| PeerError::Timeout(what))?
            .ok_or(PeerError::Closed)
    }

    /// Waits for the first message matching `pred`. An `error` from the
    /// relay aborts the wait; everything else is kept for later.
    pub async fn expect<F>(&mut self, pred: F) -> Result<SignalMessage, PeerError>
    where
        F: Fn(&SignalMessage) -> bool,
    {
        if let Some(index) = self.stash.iter().position(&pred) {
            if let Some(msg) = self.stash.remove(index) {
                return Ok(msg);
            }
        }

        loop {
            let msg = self.incoming.recv().await.ok_or(PeerError::Closed)?;
            match msg {
                SignalMessage::Error { message } => return Err(PeerError::Server(message)),
                msg if pred(&msg) => return Ok(msg),
                other => {
                    debug!("Deferring {} while waiting", other.kind());
                    self.stash.push_back(other);
                }
            }
        }
    }

    pub async fn expect_within<F>(
        &mut self,
        timeout: Duration,
        what: &'static str,
        pred: F,
    ) -> Result<SignalMessage, PeerError>
    where
        F: Fn(&SignalMessage) -> bool,
    {
        tokio::time::timeout(timeout, self.expect(pred))
            .await
            .map_err(|_| PeerError::Timeout(what))?
    }

    /// Puts messages back in front of the queue, preserving their order.
    pub fn requeue(&mut self, messages: Vec<SignalMessage>) {
        for msg in messages.into_iter().rev() {
            self.stash.push_front(msg);
        }
    }

    pub fn close(&self) {
        let _ = self.outgoing.send(Message::Close(None));
    }
}

// The writer exits on its own once the outgoing queue is dropped.
impl Drop for SignalingClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
