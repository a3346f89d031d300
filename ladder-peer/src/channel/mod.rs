mod data_channel_link;
mod game_channel;
mod relay_link;

pub use data_channel_link::{DEFAULT_KEEPALIVE, DataChannelLink};
pub use game_channel::{ChannelEvent, GameChannel};
pub use relay_link::RelayLink;
