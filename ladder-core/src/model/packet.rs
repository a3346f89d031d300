use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Frame sent over the peer-to-peer data channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Packet<T> {
    System(SystemMessage),
    User(T),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SystemMessage {
    Ping { timestamp: u64 },
    Pong { timestamp: u64 },
    Goodbye,
}

impl<T: Serialize> Packet<T> {
    pub fn encode(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }
}

impl<T: DeserializeOwned> Packet<T> {
    pub fn decode(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}
