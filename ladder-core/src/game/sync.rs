use crate::error::GameError;
use crate::game::dice::Dice;
use crate::game::message::GameMessage;
use crate::game::state::{GameState, TurnResult};
use crate::model::Seat;
use tracing::debug;

/// What a message from the opponent did to the local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEvent {
    Rolled { value: u8 },
    Turn(TurnResult),
    Reset,
    /// Echo of our own action; nothing changed.
    Ignored,
}

/// One side of a two-player match kept in step with the other side through
/// [`GameMessage`]s. Every remote message is replayed through the same rules
/// as local turns, so a peer cannot place its token anywhere it likes.
#[derive(Debug, Clone)]
pub struct NetworkGame {
    state: GameState,
    seat: Seat,
    /// Number of the game being played; the first game is round 0.
    round: u32,
}

impl NetworkGame {
    pub fn new(state: GameState, seat: Seat) -> Self {
        Self {
            state,
            seat,
            round: 0,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn is_my_turn(&self) -> bool {
        !self.state.is_over() && self.state.current() == self.seat
    }

    /// Plays our turn and returns the messages the opponent needs to follow it.
    pub fn local_turn(
        &mut self,
        dice: &mut dyn Dice,
    ) -> Result<(TurnResult, Vec<GameMessage>), GameError> {
        let player = self.seat.index() as u8;
        let value = dice.roll();
        self.state.roll(self.seat, value)?;
        let result = self.state.advance(self.seat)?;

        let mut messages = vec![GameMessage::DiceRoll { player, value }];
        if result.outcome.moved() {
            messages.push(GameMessage::Move {
                player,
                position: result.outcome.position(),
            });
        }
        if let Some(next) = result.next {
            messages.push(GameMessage::TurnChange {
                current_player: next.index() as u8,
            });
        }

        Ok((result, messages))
    }

    pub fn apply_remote(&mut self, msg: GameMessage) -> Result<RemoteEvent, GameError> {
        let opponent = self.seat.other();

        match msg {
            GameMessage::DiceRoll { player, value } => {
                if seat_of(player)? == self.seat {
                    debug!("Ignoring dice roll attributed to our own seat");
                    return Ok(RemoteEvent::Ignored);
                }
                self.state.roll(opponent, value)?;
                Ok(RemoteEvent::Rolled { value })
            }

            GameMessage::Move { player, position } => {
                if seat_of(player)? == self.seat {
                    debug!("Ignoring move attributed to our own seat");
                    return Ok(RemoteEvent::Ignored);
                }
                let expected = self.state.preview().ok_or(GameError::NoRoll)?;
                if !expected.moved() || expected.position() != position {
                    return Err(GameError::Desync(format!(
                        "opponent claims square {position}, rules give {}",
                        expected.position()
                    )));
                }
                Ok(RemoteEvent::Turn(self.state.advance(opponent)?))
            }

            GameMessage::TurnChange { current_player } => {
                let named = seat_of(current_player)?;

                // An overshoot is announced as a roll followed directly by the
                // turn change, with no move in between.
                let event = match self.state.preview() {
                    Some(outcome) if outcome.moved() => {
                        return Err(GameError::Desync(
                            "turn passed before the rolled move arrived".into(),
                        ));
                    }
                    Some(_) => RemoteEvent::Turn(self.state.advance(opponent)?),
                    None => RemoteEvent::Ignored,
                };

                if self.state.current() != named {
                    return Err(GameError::Desync(format!(
                        "opponent says it is the {named}'s turn, rules say the {}'s",
                        self.state.current()
                    )));
                }
                Ok(event)
            }

            GameMessage::Reset { round } => {
                // Both players asked for the same rematch, or the reset is
                // older than the game already under way.
                if round <= self.round {
                    debug!("Ignoring reset to round {} in round {}", round, self.round);
                    return Ok(RemoteEvent::Ignored);
                }
                self.state.reset();
                self.round = round;
                Ok(RemoteEvent::Reset)
            }
        }
    }

    /// Starts the next round locally and returns the message announcing it.
    pub fn reset(&mut self) -> GameMessage {
        self.state.reset();
        self.round += 1;
        GameMessage::Reset { round: self.round }
    }
}

fn seat_of(player: u8) -> Result<Seat, GameError> {
    Seat::from_index(player as usize).ok_or(GameError::InvalidPlayer(player))
}
