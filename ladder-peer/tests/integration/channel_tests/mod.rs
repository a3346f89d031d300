use ladder_core::game::GameMessage;
use ladder_core::{Packet, SystemMessage};
use ladder_peer::{ChannelEvent, DataChannelLink, GameChannel, RelayLink};
use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{connect_pair, seated_pair, spawn_relay};

const EVENT_TIMEOUT: Duration = Duration::from_secs(15);

async fn next_event(channel: &mut dyn GameChannel) -> ChannelEvent {
    tokio::time::timeout(EVENT_TIMEOUT, channel.recv())
        .await
        .expect("timeout waiting for channel event")
        .expect("channel closed")
}

/// Runs `recv` for up to `limit`, returning the channel afterwards.
async fn drive(mut channel: DataChannelLink, limit: Duration) -> (DataChannelLink, Option<ChannelEvent>) {
    let event = tokio::time::timeout(limit, channel.recv()).await.ok().flatten();
    (channel, event)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_opponent_falling_back_moves_direct_side_to_relay() {
    init_tracing();
    let addr = spawn_relay().await;
    let (host_signaling, guest_signaling, session_id) = seated_pair(addr).await.unwrap();
    let (host_side, guest_side) = connect_pair().await.expect("link pair");

    let mut host = DataChannelLink::new(
        host_side.link,
        host_side.channel,
        host_side.events,
        host_signaling,
        session_id,
    );

    // The guest's handshake gave up: its link is closed and it plays through
    // the relay.
    guest_side.link.close().await.unwrap();
    let mut guest = RelayLink::new(guest_signaling, session_id);

    let roll = GameMessage::DiceRoll { player: 1, value: 4 };
    guest.send(&roll).await.unwrap();
    assert_eq!(next_event(&mut host).await, ChannelEvent::Game(roll));

    for _ in 0..150 {
        if !host.is_direct() {
            break;
        }
        let (channel, event) = drive(host, Duration::from_millis(100)).await;
        assert_eq!(event, None);
        host = channel;
    }
    assert!(!host.is_direct(), "host never noticed the closed link");
    assert_eq!(host.transport(), "relay");

    let reply = GameMessage::TurnChange { current_player: 0 };
    host.send(&reply).await.unwrap();
    assert_eq!(next_event(&mut guest).await, ChannelEvent::Game(reply));

    guest.close().await;
    assert_eq!(next_event(&mut host).await, ChannelEvent::OpponentLeft);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_keepalive_pings_and_measures_round_trip() {
    init_tracing();
    let addr = spawn_relay().await;
    let (host_signaling, _guest_signaling, session_id) = seated_pair(addr).await.unwrap();
    let (host_side, mut guest_side) = connect_pair().await.expect("link pair");

    let host = DataChannelLink::new(
        host_side.link,
        host_side.channel,
        host_side.events,
        host_signaling,
        session_id,
    )
    .with_keepalive(Duration::from_millis(50));
    assert_eq!(host.round_trip(), None);

    let running = tokio::spawn(drive(host, Duration::from_secs(2)));

    let bytes = guest_side.recv_message().await.unwrap();
    let Packet::System(SystemMessage::Ping { timestamp }) =
        Packet::<GameMessage>::decode(&bytes).unwrap()
    else {
        panic!("expected a ping");
    };
    let pong = Packet::<GameMessage>::System(SystemMessage::Pong { timestamp });
    guest_side.send(&pong.encode().unwrap()).await.unwrap();

    let (host, event) = running.await.unwrap();
    assert_eq!(event, None);
    assert!(host.round_trip().is_some());
    assert!(host.is_direct());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unanswered_pings_switch_to_relay() {
    init_tracing();
    let addr = spawn_relay().await;
    let (host_signaling, guest_signaling, session_id) = seated_pair(addr).await.unwrap();
    let (host_side, _guest_side) = connect_pair().await.expect("link pair");

    let host = DataChannelLink::new(
        host_side.link,
        host_side.channel,
        host_side.events,
        host_signaling,
        session_id,
    )
    .with_keepalive(Duration::from_millis(30));

    // Nobody reads the guest's side of the link, so no pong ever comes back.
    let (mut host, event) = drive(host, Duration::from_millis(600)).await;
    assert_eq!(event, None);
    assert!(!host.is_direct());

    let mut guest = RelayLink::new(guest_signaling, session_id);
    let msg = GameMessage::Reset { round: 1 };
    host.send(&msg).await.unwrap();
    assert_eq!(next_event(&mut guest).await, ChannelEvent::Game(msg));
}
