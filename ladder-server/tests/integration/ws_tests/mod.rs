use ladder_core::SignalMessage;
use serde_json::{Value, json};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{WsTestClient, is_error};

async fn get_status(addr: SocketAddr) -> Value {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /status HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    let body = response.split("\r\n\r\n").nth(1).unwrap();
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_connect_greets_with_welcome_and_ice_config() {
    init_tracing();
    let addr = spawn_relay().await;

    let a = WsTestClient::connect(addr).await.unwrap();
    let b = WsTestClient::connect(addr).await.unwrap();

    assert_ne!(a.peer_id, b.peer_id);
}

#[tokio::test]
async fn test_ping_gets_pong() {
    init_tracing();
    let addr = spawn_relay().await;
    let mut client = WsTestClient::connect(addr).await.unwrap();

    client.send(&SignalMessage::Ping).await.unwrap();

    assert_eq!(client.recv().await.unwrap(), SignalMessage::Pong);
}

#[tokio::test]
async fn test_garbage_gets_error_and_connection_survives() {
    init_tracing();
    let addr = spawn_relay().await;
    let mut client = WsTestClient::connect(addr).await.unwrap();

    client.send_text("not json at all").await.unwrap();
    assert!(is_error(&client.recv().await.unwrap(), "Invalid message"));

    client
        .send_text(r#"{"type":"teleport","to":100}"#)
        .await
        .unwrap();
    assert!(is_error(&client.recv().await.unwrap(), "Invalid message"));

    client.send(&SignalMessage::Ping).await.unwrap();
    assert_eq!(client.recv().await.unwrap(), SignalMessage::Pong);
}

#[tokio::test]
async fn test_full_session_over_websocket() {
    init_tracing();
    let addr = spawn_relay().await;
    let mut host = WsTestClient::connect(addr).await.unwrap();
    let mut guest = WsTestClient::connect(addr).await.unwrap();

    host.send_text(r#"{"type":"create_session","player_name":"Ada","player_avatar":"🦊"}"#)
        .await
        .unwrap();
    let SignalMessage::SessionCreated {
        session_id,
        invite_code,
    } = host.recv().await.unwrap()
    else {
        panic!("expected session_created");
    };

    let join = json!({
        "type": "join_session",
        "invite_code": invite_code.as_str().to_lowercase(),
    });
    guest.send_text(&join.to_string()).await.unwrap();

    let SignalMessage::SessionJoined { host_info, .. } = guest.recv().await.unwrap() else {
        panic!("expected session_joined");
    };
    assert_eq!(host_info.name, "Ada");
    assert_eq!(host_info.avatar, "🦊");

    let SignalMessage::PlayerJoined { guest_info } = host.recv().await.unwrap() else {
        panic!("expected player_joined");
    };
    assert_eq!(guest_info.name, "Guest");

    assert_eq!(
        host.recv().await.unwrap(),
        SignalMessage::GameReady { session_id }
    );
    assert_eq!(
        guest.recv().await.unwrap(),
        SignalMessage::GameReady { session_id }
    );

    let status = get_status(addr).await;
    assert_eq!(status["server"], "active");
    assert_eq!(status["sessions"], 1);
    assert_eq!(status["clients"], 2);

    let move_msg = SignalMessage::GameMessage {
        session_id,
        data: json!({ "move": { "player": 0, "position": 38 } }),
    };
    host.send(&move_msg).await.unwrap();
    assert_eq!(guest.recv().await.unwrap(), move_msg);
    assert!(host.try_recv().await.unwrap().is_none());

    guest.close().await.unwrap();
    assert_eq!(
        host.recv().await.unwrap(),
        SignalMessage::PlayerDisconnected { session_id }
    );
}

#[tokio::test]
async fn test_join_unknown_code_over_websocket() {
    init_tracing();
    let addr = spawn_relay().await;
    let mut guest = WsTestClient::connect(addr).await.unwrap();

    guest
        .send_text(r#"{"type":"join_session","invite_code":"ZZZZZZZZ"}"#)
        .await
        .unwrap();

    assert!(is_error(&guest.recv().await.unwrap(), "Session not found"));
}

#[tokio::test]
async fn test_status_counts_clients() {
    init_tracing();
    let addr = spawn_relay().await;

    let status = get_status(addr).await;
    assert_eq!(status["sessions"], 0);
    assert_eq!(status["clients"], 0);

    let _client = WsTestClient::connect(addr).await.unwrap();
    let status = get_status(addr).await;
    assert_eq!(status["clients"], 1);
}
