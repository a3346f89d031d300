use crate::error::GameError;
use crate::game::dice::Dice;
use crate::game::state::{GameState, TurnResult};
use crate::model::Seat;

/// Both halves of one exchange in a solo match: the player's turn, then the
/// bot's reply unless the player already won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoloTurn {
    pub player: TurnResult,
    pub bot: Option<TurnResult>,
}

/// Local player (host seat) against a bot that rolls for itself.
pub struct SoloGame {
    state: GameState,
    dice: Box<dyn Dice>,
}

impl SoloGame {
    pub fn new(state: GameState, dice: Box<dyn Dice>) -> Self {
        Self { state, dice }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player_seat(&self) -> Seat {
        Seat::Host
    }

    pub fn play_round(&mut self) -> Result<SoloTurn, GameError> {
        let player = self.state.play_turn(Seat::Host, self.dice.as_mut())?;
        let bot = if player.is_win() {
            None
        } else {
            Some(self.state.play_turn(Seat::Guest, self.dice.as_mut())?)
        };
        Ok(SoloTurn { player, bot })
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}
