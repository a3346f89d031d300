//! Board rules and two-player turn handling.

mod board;
mod dice;
mod message;
mod solo;
mod state;
mod sync;

pub use board::{Board, FINAL_SQUARE, MoveOutcome, START_SQUARE};
pub use dice::{Dice, SeededDice, ThreadDice};
pub use message::GameMessage;
pub use solo::{SoloGame, SoloTurn};
pub use state::{GameState, TurnResult};
pub use sync::{NetworkGame, RemoteEvent};
