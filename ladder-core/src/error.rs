use crate::model::Seat;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("the game is already over")]
    GameOver,

    #[error("it is not the {0}'s turn")]
    NotYourTurn(Seat),

    #[error("a roll is already pending")]
    RollPending,

    #[error("no roll to move with")]
    NoRoll,

    #[error("dice value {0} is outside 1..=6")]
    InvalidDice(u8),

    #[error("player index {0} does not exist")]
    InvalidPlayer(u8),

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("opponent state diverged: {0}")]
    Desync(String),
}

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
