use crate::cli::StatsArgs;
use anyhow::Result;
use chrono::Utc;
use colored::*;
use dialoguer::Confirm;
use ladder_core::stats::{PlayerStats, SESSION_WIN_GOAL, StatsStore};
use std::path::Path;
use std::time::Duration;

/// Records a finished game in the profile's stats file and reports a
/// completed session.
pub fn record_result(store: &mut StatsStore, won: bool, played: Duration) -> Result<()> {
    if let Some(summary) = store.record_game(won, played.as_secs(), Utc::now())? {
        println!(
            "{}",
            format!(
                "🏆 Session complete: {} wins in {} games ({}%)",
                summary.wins, summary.games, summary.win_rate
            )
            .yellow()
            .bold()
        );
    }
    Ok(())
}

pub fn run_stats(data_dir: &Path, profile: &str, args: &StatsArgs) -> Result<()> {
    let mut store = StatsStore::open(data_dir, profile)?;

    if args.reset_session {
        store.reset_session(Utc::now())?;
        println!("{}", "🔄 Session reset".yellow());
    }
    if args.reset_global {
        let confirmed = args.yes
            || Confirm::new()
                .with_prompt("Erase all-time stats? This cannot be undone")
                .default(false)
                .interact()?;
        if confirmed {
            store.reset_global()?;
            println!("{}", "🗑 All-time stats erased".yellow());
        }
    }

    print_book(&store, profile);
    Ok(())
}

/// Prints the stats of `store` under the profile's name.
fn print_book(store: &StatsStore, profile: &str) {
    let book = store.book();

    println!("{}", format!("📊 Stats for {profile}").bold());
    print_block("All time", &book.global);
    print_block("On this device", &book.local);
    println!(
        "  Session: {}/{} wins toward the goal, started {}",
        book.session_wins,
        SESSION_WIN_GOAL,
        book.session_start.format("%Y-%m-%d %H:%M")
    );

    if book.history.is_empty() {
        println!("  {}", "No completed sessions yet".dimmed());
    } else {
        println!("{}", "  Completed sessions:".bold());
        for (i, s) in book.history.iter().enumerate() {
            println!(
                "   {:>2}. {} → {}  {} wins / {} games ({}%)",
                i + 1,
                s.start.format("%Y-%m-%d %H:%M"),
                s.end.format("%H:%M"),
                s.wins,
                s.games,
                s.win_rate
            );
        }
    }
    println!("  {}", store.path().display().to_string().dimmed());
}

pub fn print_block(title: &str, stats: &PlayerStats) {
    println!("{}", format!("  {title}").cyan().bold());
    println!(
        "    played {}  won {}  lost {}  win rate {}%",
        stats.games_played,
        stats.wins.to_string().green(),
        stats.losses.to_string().red(),
        stats.win_rate()
    );
    println!(
        "    streak {} (best {})  fastest win {}  longest game {}  total {}",
        stats.win_streak,
        stats.best_win_streak,
        fmt_secs(stats.fastest_win),
        fmt_secs(stats.longest_game),
        fmt_secs(Some(stats.total_playtime)),
    );
}

fn fmt_secs(secs: Option<u64>) -> String {
    match secs {
        Some(s) => format!("{}m{:02}s", s / 60, s % 60),
        None => "-".to_owned(),
    }
}
