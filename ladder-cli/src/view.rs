use colored::*;
use ladder_core::game::{FINAL_SQUARE, GameState, MoveOutcome, TurnResult};
use ladder_core::{PlayerInfo, Seat};
use std::collections::HashMap;

const ROW_WIDTH: u8 = 10;

/// Display names for both seats, `"🦊 Ada"` style.
pub struct Names {
    host: String,
    guest: String,
}

impl Names {
    pub fn new(host: &PlayerInfo, guest: &PlayerInfo) -> Self {
        Self {
            host: host.to_string(),
            guest: guest.to_string(),
        }
    }

    pub fn of(&self, seat: Seat) -> &str {
        match seat {
            Seat::Host => &self.host,
            Seat::Guest => &self.guest,
        }
    }
}

pub fn describe_turn(result: &TurnResult, who: &str) -> String {
    let roll = result.roll;
    match result.outcome {
        MoveOutcome::Overshoot { at } => {
            format!("{who} rolled {roll}, needs exactly {} and stays on {at}", FINAL_SQUARE - at)
        }
        MoveOutcome::Step { to } if to == FINAL_SQUARE => {
            format!("{who} rolled {roll} and reached {FINAL_SQUARE}!")
        }
        MoveOutcome::Step { to } => format!("{who} rolled {roll} and moved to {to}"),
        MoveOutcome::Ladder { landed, to } => {
            format!("{who} rolled {roll}, climbed the ladder at {landed} up to {to}")
        }
        MoveOutcome::Snake { landed, to } => {
            format!("{who} rolled {roll}, bitten by the snake at {landed}, down to {to}")
        }
    }
}

pub fn print_turn(result: &TurnResult, names: &Names) {
    let line = describe_turn(result, names.of(result.seat));
    let styled = match result.outcome {
        MoveOutcome::Ladder { .. } => line.green(),
        MoveOutcome::Snake { .. } => line.red(),
        MoveOutcome::Overshoot { .. } => line.yellow(),
        MoveOutcome::Step { .. } if result.is_win() => line.green().bold(),
        MoveOutcome::Step { .. } => line.normal(),
    };
    println!("  {}", styled);
}

/// Ten rows of ten squares, 100 at the top, alternating direction like a
/// printed board. Ladder feet are green, snake heads red.
pub fn render_board(state: &GameState) -> String {
    let snakes: HashMap<u8, u8> = state.board().snakes().collect();
    let ladders: HashMap<u8, u8> = state.board().ladders().collect();
    let host = state.position(Seat::Host);
    let guest = state.position(Seat::Guest);

    let mut out = String::new();
    for row in (0..ROW_WIDTH).rev() {
        let first = row * ROW_WIDTH + 1;
        let mut squares: Vec<u8> = (first..first + ROW_WIDTH).collect();
        if row % 2 == 1 {
            squares.reverse();
        }

        for square in squares {
            let cell = match (square == host, square == guest) {
                (true, true) => " HG".bold().cyan(),
                (true, false) => "  H".bold().blue(),
                (false, true) => "  G".bold().magenta(),
                _ => {
                    let label = format!("{square:>3}");
                    if snakes.contains_key(&square) {
                        label.red()
                    } else if ladders.contains_key(&square) {
                        label.green()
                    } else {
                        label.dimmed()
                    }
                }
            };
            out.push_str(&format!("{cell} "));
        }
        out.push('\n');
    }
    out
}

pub fn print_status(state: &GameState, names: &Names) {
    print!("{}", render_board(state));
    println!(
        "  {} H on {}   {} G on {}",
        names.of(Seat::Host).blue(),
        state.position(Seat::Host),
        names.of(Seat::Guest).magenta(),
        state.position(Seat::Guest),
    );
}
