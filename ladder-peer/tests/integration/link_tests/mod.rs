use ladder_core::game::GameMessage;
use ladder_core::{Packet, SystemMessage};

use crate::integration::init_tracing;
use crate::utils::connect_pair;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_loopback_pair_exchanges_frames() {
    init_tracing();
    let (mut host, mut guest) = connect_pair().await.expect("link pair");

    assert_eq!(host.channel.label(), "game");
    assert_eq!(guest.channel.label(), "game");

    host.send(b"from host").await.unwrap();
    assert_eq!(&guest.recv_message().await.unwrap()[..], b"from host");

    guest.send(b"from guest").await.unwrap();
    assert_eq!(&host.recv_message().await.unwrap()[..], b"from guest");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_game_packets_survive_the_data_channel() {
    init_tracing();
    let (host, mut guest) = connect_pair().await.expect("link pair");

    let sent = [
        Packet::User(GameMessage::DiceRoll {
            player: 0,
            value: 6,
        }),
        Packet::User(GameMessage::Move {
            player: 0,
            position: 7,
        }),
        Packet::System(SystemMessage::Ping { timestamp: 42 }),
    ];
    for packet in &sent {
        host.send(&packet.encode().unwrap()).await.unwrap();
    }

    for expected in &sent {
        let bytes = guest.recv_message().await.unwrap();
        let got = Packet::<GameMessage>::decode(&bytes).unwrap();
        assert_eq!(&got, expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_closing_one_side_is_noticed() {
    init_tracing();
    let (host, mut guest) = connect_pair().await.expect("link pair");

    host.link.close().await.unwrap();

    guest.wait_disconnected().await.unwrap();
}
