use crate::cli::{ConnectArgs, StatsArgs, default_server};
use crate::commands::{run_host, run_join, run_leaderboard, run_solo, run_stats, run_status};
use anyhow::Result;
use colored::*;
use dialoguer::{Input, Select};
use ladder_core::PlayerInfo;
use std::env;
use std::path::Path;

const ITEMS: [&str; 7] = [
    "Solo",
    "Host",
    "Join",
    "Stats",
    "Leaderboard",
    "Server status",
    "Quit",
];

pub async fn run_menu(data_dir: &Path, profile: &PlayerInfo) -> Result<()> {
    println!("{}", "🐍 Snake & Ladder 🪜".green().bold());
    println!("Playing as {}", profile.to_string().cyan());
    let mut server = default_server(env::var("LADDER_SERVER").ok());

    loop {
        let choice = Select::new()
            .with_prompt("Main menu")
            .items(&ITEMS)
            .default(0)
            .interact()?;

        let outcome = match choice {
            0 => run_solo(data_dir, profile),
            1 => {
                server = ask_server(&server)?;
                run_host(connect_to(&server), data_dir, profile).await
            }
            2 => {
                server = ask_server(&server)?;
                let code: String = Input::new().with_prompt("Invite code").interact_text()?;
                run_join(&code, connect_to(&server), data_dir, profile).await
            }
            3 => run_stats(data_dir, &profile.name, &StatsArgs::default()),
            4 => {
                server = ask_server(&server)?;
                run_leaderboard(&server).await
            }
            5 => {
                server = ask_server(&server)?;
                run_status(&server).await
            }
            _ => return Ok(()),
        };

        if let Err(e) = outcome {
            println!("{} {:#}", "✖".red().bold(), e);
        }
    }
}

/// Asks for the relay url, offering the last one used.
fn ask_server(last: &str) -> Result<String> {
    let server: String = Input::new()
        .with_prompt("Relay server")
        .default(last.to_owned())
        .interact_text()?;
    Ok(server.trim().to_owned())
}

fn connect_to(server: &str) -> ConnectArgs {
    ConnectArgs {
        server: server.to_owned(),
        ..ConnectArgs::default()
    }
}
