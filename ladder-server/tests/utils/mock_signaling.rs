use async_trait::async_trait;
use ladder_core::{PeerId, SignalMessage};
use ladder_server::SignalingOutput;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// A signal captured on its way to a peer.
#[derive(Debug, Clone)]
pub struct SentSignal {
    pub peer_id: PeerId,
    pub msg: SignalMessage,
}

/// Mock SignalingOutput that captures all outgoing signals.
#[derive(Clone)]
pub struct MockSignalingOutput {
    /// Channel to send captured signals.
    tx: mpsc::UnboundedSender<SentSignal>,
    /// All captured signals (for verification).
    signals: Arc<Mutex<Vec<SentSignal>>>,
}

impl MockSignalingOutput {
    /// Create a new MockSignalingOutput and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SentSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let signaling = Self {
            tx,
            signals: Arc::new(Mutex::new(Vec::new())),
        };
        (signaling, rx)
    }

    /// All signals sent to a specific peer, oldest first.
    pub async fn signals_for(&self, peer_id: &PeerId) -> Vec<SignalMessage> {
        self.signals
            .lock()
            .await
            .iter()
            .filter(|s| &s.peer_id == peer_id)
            .map(|s| s.msg.clone())
            .collect()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send_signal(&self, peer_id: &PeerId, msg: SignalMessage) {
        tracing::debug!("[MockSignaling] {} to {}", msg.kind(), peer_id);

        let sent = SentSignal {
            peer_id: peer_id.clone(),
            msg,
        };

        self.signals.lock().await.push(sent.clone());
        let _ = self.tx.send(sent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signaling_captures_signal() {
        let (signaling, mut rx) = MockSignalingOutput::new();
        let peer_id = PeerId::new();

        signaling.send_signal(&peer_id, SignalMessage::Pong).await;

        let sent = rx.recv().await.unwrap();
        assert_eq!(sent.peer_id, peer_id);
        assert_eq!(signaling.signals_for(&peer_id).await, vec![SignalMessage::Pong]);
    }
}
