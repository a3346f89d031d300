use serde::{Deserialize, Serialize};

/// Turn-sync message exchanged between the two players.
///
/// Externally tagged so the same type can go postcard-encoded over the data
/// channel and as JSON (`{"dice_roll": {"player": 0, "value": 4}}`) inside a
/// relayed `game_message`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameMessage {
    DiceRoll { player: u8, value: u8 },
    Move { player: u8, position: u8 },
    TurnChange { current_player: u8 },
    /// Starts game number `round` of the match. Rounds count up from 1 on
    /// each side, so a reset both players sent at once is a duplicate.
    Reset { round: u32 },
}
