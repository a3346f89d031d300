use crate::commands::record_result;
use crate::view::{Names, print_status, print_turn};
use anyhow::Result;
use colored::*;
use dialoguer::Confirm;
use ladder_core::PlayerInfo;
use ladder_core::game::{GameState, SoloGame, ThreadDice};
use ladder_core::stats::StatsStore;
use std::io::{self, BufRead};
use std::path::Path;
use std::time::Instant;

pub fn run_solo(data_dir: &Path, profile: &PlayerInfo) -> Result<()> {
    let mut store = StatsStore::open(data_dir, &profile.name)?;
    let names = Names::new(profile, &PlayerInfo::new("Computer", "🤖"));
    let mut game = SoloGame::new(GameState::default(), Box::new(ThreadDice));
    let stdin = io::stdin();

    println!("{}", "🎲 Solo game against the computer".bold());
    loop {
        let started = Instant::now();
        print_status(game.state(), &names);

        while !game.state().is_over() {
            println!("{}", "Press Enter to roll (q to quit)".dimmed());
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 || line.trim() == "q" {
                return Ok(());
            }

            let round = game.play_round()?;
            print_turn(&round.player, &names);
            if let Some(bot) = &round.bot {
                print_turn(bot, &names);
            }
            print_status(game.state(), &names);
        }

        let won = game.state().winner() == Some(game.player_seat());
        if won {
            println!("{}", "🎉 You win!".green().bold());
        } else {
            println!("{}", "💀 The computer wins.".red().bold());
        }
        record_result(&mut store, won, started.elapsed())?;

        let again = Confirm::new()
            .with_prompt("Play again?")
            .default(true)
            .interact()?;
        if !again {
            return Ok(());
        }
        game.reset();
    }
}
