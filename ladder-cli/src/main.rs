mod cli;
mod commands;
mod logger;
mod profile;
mod view;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use ladder_core::PlayerInfo;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    let data_dir = cli.data_dir;
    let profile = profile::load(&data_dir)?;

    match cli.command {
        Some(Commands::Serve(args)) => commands::run_serve(args, &data_dir).await,
        Some(Commands::Host(args)) => commands::run_host(args, &data_dir, &profile).await,
        Some(Commands::Join { code, connect }) => {
            commands::run_join(&code, connect, &data_dir, &profile).await
        }
        Some(Commands::Solo) => commands::run_solo(&data_dir, &profile),
        Some(Commands::Stats(args)) => commands::run_stats(&data_dir, &profile.name, &args),
        Some(Commands::Status(arg)) => commands::run_status(&arg.server).await,
        Some(Commands::Leaderboard(arg)) => commands::run_leaderboard(&arg.server).await,
        Some(Commands::Account { action, args }) => {
            commands::run_account(action, args, &data_dir, &profile).await
        }
        Some(Commands::Profile { name, avatar }) => {
            let updated = PlayerInfo::new(
                name.unwrap_or(profile.name),
                avatar.unwrap_or(profile.avatar),
            );
            profile::save(&data_dir, &updated)?;
            println!("{} {}", "✔ Profile saved:".green().bold(), updated);
            Ok(())
        }
        None => commands::run_menu(&data_dir, &profile).await,
    }
}
