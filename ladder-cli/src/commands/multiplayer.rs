use crate::cli::ConnectArgs;
use crate::commands::record_result;
use crate::view::{Names, print_status, print_turn};
use anyhow::{Context, Result};
use colored::*;
use ladder_core::game::{GameState, NetworkGame, RemoteEvent, ThreadDice};
use ladder_core::stats::StatsStore;
use ladder_core::{InviteCode, PlayerInfo, Seat};
use ladder_peer::{ChannelEvent, ClientConfig, Lobby, Match};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, warn};

fn client_config(args: &ConnectArgs) -> ClientConfig {
    ClientConfig {
        connect_timeout: Duration::from_secs(args.connect_timeout),
        relay_fallback: !args.no_relay_fallback,
        ..ClientConfig::with_server(&args.server)
    }
}

pub async fn run_host(args: ConnectArgs, data_dir: &Path, profile: &PlayerInfo) -> Result<()> {
    let lobby = Lobby::new(client_config(&args));
    let (code, pending) = lobby
        .host(profile)
        .await
        .with_context(|| format!("Could not open a session on {}", args.server))?;

    println!("Invite code: {}", code.as_str().yellow().bold());
    println!("{}", "Waiting for a friend to join... (Ctrl+C to cancel)".dimmed());

    let matched = tokio::select! {
        result = pending.wait() => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("Cancelled");
            return Ok(());
        }
    };

    play_match(matched, data_dir, profile).await
}

pub async fn run_join(
    code: &str,
    args: ConnectArgs,
    data_dir: &Path,
    profile: &PlayerInfo,
) -> Result<()> {
    let lobby = Lobby::new(client_config(&args));
    let code = InviteCode::parse(code);
    println!("Joining {}...", code.as_str().yellow());

    let matched = lobby
        .join(&code, profile)
        .await
        .with_context(|| format!("Could not join {code}"))?;

    play_match(matched, data_dir, profile).await
}

enum Input {
    Line(String),
    Eof,
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Result<Input> {
    Ok(match lines.next_line().await? {
        Some(line) => Input::Line(line),
        None => Input::Eof,
    })
}

async fn play_match(mut m: Match, data_dir: &Path, profile: &PlayerInfo) -> Result<()> {
    let mut store = StatsStore::open(data_dir, &profile.name)?;
    let names = match m.seat {
        Seat::Host => Names::new(profile, &m.opponent),
        Seat::Guest => Names::new(&m.opponent, profile),
    };
    let mut game = NetworkGame::new(GameState::default(), m.seat);
    let mut dice = ThreadDice;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut started = Instant::now();
    let mut recorded = false;

    println!(
        "{} {} ({} link). You are the {}.",
        "🤝 Playing against".green().bold(),
        m.opponent,
        m.channel.transport(),
        m.seat
    );
    print_status(game.state(), &names);

    loop {
        if game.state().is_over() && !recorded {
            recorded = true;
            let won = game.state().winner() == Some(game.seat());
            if won {
                println!("{}", "🎉 You win!".green().bold());
            } else {
                println!("{}", format!("💀 {} wins.", m.opponent.name).red().bold());
            }
            record_result(&mut store, won, started.elapsed())?;
            println!("{}", "Enter for a rematch, q to leave".dimmed());
        } else if game.is_my_turn() {
            println!("{}", "Your turn: press Enter to roll (q to quit)".cyan());
        }

        let waiting_for_input = game.is_my_turn() || game.state().is_over();

        tokio::select! {
            input = read_line(&mut stdin), if waiting_for_input => {
                let line = match input? {
                    Input::Line(line) => line,
                    Input::Eof => break,
                };
                if line.trim() == "q" {
                    break;
                }

                if game.state().is_over() {
                    let reset = game.reset();
                    m.channel.send(&reset).await?;
                    recorded = false;
                    started = Instant::now();
                    println!("{}", "🔄 Rematch!".bold());
                    print_status(game.state(), &names);
                    continue;
                }

                let (result, messages) = game.local_turn(&mut dice)?;
                for msg in &messages {
                    m.channel.send(msg).await?;
                }
                print_turn(&result, &names);
                print_status(game.state(), &names);
            }

            event = m.channel.recv() => {
                let msg = match event {
                    Some(ChannelEvent::Game(msg)) => msg,
                    Some(ChannelEvent::OpponentLeft) | None => {
                        println!("{}", format!("👋 {} left the game", m.opponent.name).yellow());
                        return Ok(());
                    }
                };

                match game.apply_remote(msg) {
                    Ok(RemoteEvent::Turn(result)) => {
                        print_turn(&result, &names);
                        print_status(game.state(), &names);
                    }
                    Ok(RemoteEvent::Reset) => {
                        recorded = false;
                        started = Instant::now();
                        println!("{}", format!("🔄 {} started a rematch", m.opponent.name).bold());
                        print_status(game.state(), &names);
                    }
                    Ok(RemoteEvent::Rolled { .. } | RemoteEvent::Ignored) => {}
                    Err(e) => {
                        error!("Opponent's game diverged: {}", e);
                        println!("{} {}", "✖ Games out of sync:".red().bold(), e);
                        break;
                    }
                }
            }
        }
    }

    m.channel.close().await;
    if !game.state().is_over() && game.state().moves(game.seat()) > 0 {
        warn!("Left an unfinished game");
    }
    Ok(())
}
