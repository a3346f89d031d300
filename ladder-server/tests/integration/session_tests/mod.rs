use ladder_core::{PeerId, PlayerInfo, SignalMessage};

use crate::integration::{TEST_READY_DELAY, create_test_manager, init_tracing};
use crate::utils::{expect_no_signal, is_error, wait_for_signal};

#[tokio::test]
async fn test_create_replies_with_invite_code() {
    init_tracing();
    let (manager, _signaling, mut signal_rx) = create_test_manager();
    let host = PeerId::new();

    let session_id = manager.create(host.clone(), PlayerInfo::default_host()).await;

    let msg = wait_for_signal(&mut signal_rx, &host, |m| {
        matches!(m, SignalMessage::SessionCreated { .. })
    })
    .await
    .unwrap();

    let SignalMessage::SessionCreated {
        session_id: created,
        invite_code,
    } = msg
    else {
        unreachable!()
    };
    assert_eq!(created, session_id);
    assert_eq!(invite_code, session_id.invite_code());
    assert_eq!(manager.lookup(&invite_code), Some(session_id));
    assert_eq!(manager.session_of(&host), Some(session_id));
    assert_eq!(manager.session_count(), 1);
}

#[tokio::test]
async fn test_join_introduces_players_then_announces_ready() {
    init_tracing();
    let (manager, signaling, mut signal_rx) = create_test_manager();
    let host = PeerId::new();
    let guest = PeerId::new();
    let host_info = PlayerInfo::new("Ada", "🦊");
    let guest_info = PlayerInfo::new("Bob", "🐢");

    let session_id = manager.create(host.clone(), host_info.clone()).await;
    manager
        .join(guest.clone(), &session_id.invite_code(), guest_info.clone())
        .await;

    let joined = wait_for_signal(&mut signal_rx, &host, |m| {
        matches!(m, SignalMessage::PlayerJoined { .. })
    })
    .await
    .unwrap();
    assert_eq!(joined, SignalMessage::PlayerJoined { guest_info });

    wait_for_signal(&mut signal_rx, &host, |m| {
        matches!(m, SignalMessage::GameReady { .. })
    })
    .await
    .unwrap();

    let guest_signals = signaling.signals_for(&guest).await;
    assert_eq!(
        guest_signals,
        vec![
            SignalMessage::SessionJoined {
                session_id,
                host_info,
            },
            SignalMessage::GameReady { session_id },
        ]
    );
    assert_eq!(manager.session_of(&guest), Some(session_id));
}

#[tokio::test]
async fn test_game_ready_waits_for_delay() {
    init_tracing();
    let (manager, _signaling, mut signal_rx) = create_test_manager();
    let host = PeerId::new();
    let guest = PeerId::new();

    let session_id = manager.create(host.clone(), PlayerInfo::default_host()).await;
    let started = tokio::time::Instant::now();
    manager
        .join(guest.clone(), &session_id.invite_code(), PlayerInfo::default_guest())
        .await;

    wait_for_signal(&mut signal_rx, &guest, |m| {
        matches!(m, SignalMessage::GameReady { .. })
    })
    .await
    .unwrap();

    assert!(started.elapsed() >= TEST_READY_DELAY);
}

#[tokio::test]
async fn test_join_accepts_lowercase_code() {
    init_tracing();
    let (manager, _signaling, mut signal_rx) = create_test_manager();
    let host = PeerId::new();
    let guest = PeerId::new();

    let session_id = manager.create(host.clone(), PlayerInfo::default_host()).await;
    let typed = ladder_core::InviteCode::parse(&session_id.invite_code().as_str().to_lowercase());
    manager
        .join(guest.clone(), &typed, PlayerInfo::default_guest())
        .await;

    wait_for_signal(&mut signal_rx, &guest, |m| {
        matches!(m, SignalMessage::SessionJoined { .. })
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_unknown_invite_is_rejected() {
    init_tracing();
    let (manager, _signaling, mut signal_rx) = create_test_manager();
    let guest = PeerId::new();

    manager
        .join(
            guest.clone(),
            &ladder_core::InviteCode::parse("DEADBEEF"),
            PlayerInfo::default_guest(),
        )
        .await;

    wait_for_signal(&mut signal_rx, &guest, |m| is_error(m, "Session not found"))
        .await
        .unwrap();
    assert_eq!(manager.session_of(&guest), None);
}

#[tokio::test]
async fn test_third_player_is_rejected() {
    init_tracing();
    let (manager, signaling, mut signal_rx) = create_test_manager();
    let host = PeerId::new();
    let guest = PeerId::new();
    let late = PeerId::new();

    let session_id = manager.create(host.clone(), PlayerInfo::default_host()).await;
    let code = session_id.invite_code();
    manager
        .join(guest.clone(), &code, PlayerInfo::default_guest())
        .await;
    manager
        .join(late.clone(), &code, PlayerInfo::new("Late", "🐌"))
        .await;

    wait_for_signal(&mut signal_rx, &late, |m| is_error(m, "Session full"))
        .await
        .unwrap();
    assert_eq!(manager.session_of(&late), None);

    let host_joins = signaling
        .signals_for(&host)
        .await
        .into_iter()
        .filter(|m| matches!(m, SignalMessage::PlayerJoined { .. }))
        .count();
    assert_eq!(host_joins, 1);
}

#[tokio::test]
async fn test_host_cannot_join_own_session() {
    init_tracing();
    let (manager, _signaling, mut signal_rx) = create_test_manager();
    let host = PeerId::new();

    let session_id = manager.create(host.clone(), PlayerInfo::default_host()).await;
    manager
        .join(host.clone(), &session_id.invite_code(), PlayerInfo::default_guest())
        .await;

    wait_for_signal(&mut signal_rx, &host, |m| {
        is_error(m, "Cannot join your own session")
    })
    .await
    .unwrap();
    assert_eq!(manager.session_of(&host), Some(session_id));
}

#[tokio::test]
async fn test_disconnect_notifies_other_seat_and_ends_session() {
    init_tracing();
    let (manager, _signaling, mut signal_rx) = create_test_manager();
    let host = PeerId::new();
    let guest = PeerId::new();

    let session_id = manager.create(host.clone(), PlayerInfo::default_host()).await;
    manager
        .join(guest.clone(), &session_id.invite_code(), PlayerInfo::default_guest())
        .await;

    manager.disconnect(&host).await;

    let msg = wait_for_signal(&mut signal_rx, &guest, |m| {
        matches!(m, SignalMessage::PlayerDisconnected { .. })
    })
    .await
    .unwrap();
    assert_eq!(msg, SignalMessage::PlayerDisconnected { session_id });

    // Let the actor wind down and the manager forget it.
    tokio::time::sleep(TEST_READY_DELAY).await;
    assert_eq!(manager.session_count(), 0);
    assert_eq!(manager.lookup(&session_id.invite_code()), None);
    assert_eq!(manager.session_of(&guest), None);
}

#[tokio::test]
async fn test_disconnect_before_ready_suppresses_game_ready() {
    init_tracing();
    let (manager, _signaling, mut signal_rx) = create_test_manager();
    let host = PeerId::new();
    let guest = PeerId::new();

    let session_id = manager.create(host.clone(), PlayerInfo::default_host()).await;
    manager
        .join(guest.clone(), &session_id.invite_code(), PlayerInfo::default_guest())
        .await;
    manager.disconnect(&guest).await;

    wait_for_signal(&mut signal_rx, &host, |m| {
        matches!(m, SignalMessage::PlayerDisconnected { .. })
    })
    .await
    .unwrap();
    expect_no_signal(&mut signal_rx, &host, |m| {
        matches!(m, SignalMessage::GameReady { .. })
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_second_create_replaces_first_session() {
    init_tracing();
    let (manager, _signaling, _signal_rx) = create_test_manager();
    let host = PeerId::new();

    let first = manager.create(host.clone(), PlayerInfo::default_host()).await;
    let second = manager.create(host.clone(), PlayerInfo::default_host()).await;

    tokio::time::sleep(TEST_READY_DELAY).await;
    assert_ne!(first, second);
    assert_eq!(manager.lookup(&first.invite_code()), None);
    assert_eq!(manager.session_of(&host), Some(second));
    assert_eq!(manager.session_count(), 1);
}
