use ladder_core::Credentials;
use ladder_core::stats::PlayerStats;
use ladder_peer::{AccountClient, PeerError};

use crate::integration::init_tracing;
use crate::utils::{client_config, spawn_relay};

#[tokio::test]
async fn test_account_round_trip() {
    init_tracing();
    let addr = spawn_relay().await;
    let client = AccountClient::new(&client_config(addr)).unwrap();
    assert_eq!(client.base_url(), format!("http://{addr}"));

    let ana = Credentials::new("Ana", "pass1");
    assert_eq!(client.register(&ana).await.unwrap().username, "Ana");

    let login = client.login(&Credentials::new("ANA", "pass1")).await.unwrap();
    assert_eq!(login.username, "Ana");

    let stats = PlayerStats {
        games_played: 2,
        wins: 2,
        fastest_win: Some(45),
        ..PlayerStats::default()
    };
    let stored = client.update_stats(&ana, &stats).await.unwrap();
    assert_eq!(stored.wins, 2);

    let profile = client.user_stats("ana").await.unwrap();
    assert_eq!(profile.stats.fastest_win, Some(45));

    let board = client.leaderboard().await.unwrap();
    assert_eq!(board.total_players, 1);
    assert_eq!(board.leaderboard[0].username, "Ana");

    assert_eq!(client.status().await.unwrap().users, 1);
}

#[tokio::test]
async fn test_refusals_carry_the_server_detail() {
    init_tracing();
    let addr = spawn_relay().await;
    let client = AccountClient::new(&client_config(addr)).unwrap();

    match client.register(&Credentials::new("bo", "pass1")).await {
        Err(PeerError::Rejected { status, detail }) => {
            assert_eq!(status, 400);
            assert_eq!(detail, "Username must be at least 3 characters");
        }
        other => panic!("unexpected {other:?}"),
    }

    match client.login(&Credentials::new("nobody", "pass1")).await {
        Err(PeerError::Rejected { status, .. }) => assert_eq!(status, 401),
        other => panic!("unexpected {other:?}"),
    }

    match client.user_stats("nobody").await {
        Err(PeerError::Rejected { status, detail }) => {
            assert_eq!(status, 404);
            assert_eq!(detail, "User not found");
        }
        other => panic!("unexpected {other:?}"),
    }
}
