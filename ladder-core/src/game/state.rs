use crate::error::GameError;
use crate::game::board::{Board, MoveOutcome, START_SQUARE};
use crate::game::dice::Dice;
use crate::model::Seat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnResult {
    pub seat: Seat,
    pub roll: u8,
    pub outcome: MoveOutcome,
    /// Seat to move next, `None` once the game is won.
    pub next: Option<Seat>,
}

impl TurnResult {
    pub fn is_win(&self) -> bool {
        self.next.is_none()
    }
}

/// Authoritative two-player game state. Both peers hold one and apply the
/// same transitions, so they agree without a central referee.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    positions: [u8; 2],
    current: Seat,
    pending_roll: Option<u8>,
    winner: Option<Seat>,
    moves: [u32; 2],
}

impl GameState {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            positions: [START_SQUARE; 2],
            current: Seat::Host,
            pending_roll: None,
            winner: None,
            moves: [0; 2],
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn position(&self, seat: Seat) -> u8 {
        self.positions[seat.index()]
    }

    pub fn current(&self) -> Seat {
        self.current
    }

    pub fn pending_roll(&self) -> Option<u8> {
        self.pending_roll
    }

    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn moves(&self, seat: Seat) -> u32 {
        self.moves[seat.index()]
    }

    pub fn roll(&mut self, seat: Seat, value: u8) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if seat != self.current {
            return Err(GameError::NotYourTurn(seat));
        }
        if self.pending_roll.is_some() {
            return Err(GameError::RollPending);
        }
        if !(1..=6).contains(&value) {
            return Err(GameError::InvalidDice(value));
        }

        self.pending_roll = Some(value);
        Ok(())
    }

    /// Outcome the pending roll would produce, without applying it.
    pub fn preview(&self) -> Option<MoveOutcome> {
        self.pending_roll
            .map(|roll| self.board.resolve(self.position(self.current), roll))
    }

    pub fn advance(&mut self, seat: Seat) -> Result<TurnResult, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if seat != self.current {
            return Err(GameError::NotYourTurn(seat));
        }
        let roll = self.pending_roll.take().ok_or(GameError::NoRoll)?;

        let outcome = self.board.resolve(self.position(seat), roll);
        if outcome.moved() {
            self.moves[seat.index()] += 1;
        }
        self.positions[seat.index()] = outcome.position();

        let next = if outcome.is_win() {
            self.winner = Some(seat);
            None
        } else {
            self.current = seat.other();
            Some(self.current)
        };

        Ok(TurnResult {
            seat,
            roll,
            outcome,
            next,
        })
    }

    pub fn play_turn(&mut self, seat: Seat, dice: &mut dyn Dice) -> Result<TurnResult, GameError> {
        self.roll(seat, dice.roll())?;
        self.advance(seat)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.board.clone());
    }

    #[cfg(test)]
    pub(crate) fn with_positions(positions: [u8; 2], current: Seat) -> Self {
        Self {
            positions,
            current,
            ..Self::default()
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Board::standard())
    }
}
