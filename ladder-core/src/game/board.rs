use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tokens wait off-board on square 0 until their first roll.
pub const START_SQUARE: u8 = 0;
pub const FINAL_SQUARE: u8 = 100;

const SNAKES: [(u8, u8); 6] = [(98, 78), (95, 56), (87, 24), (62, 18), (54, 34), (16, 6)];
const LADDERS: [(u8, u8); 8] = [
    (1, 38),
    (4, 14),
    (9, 21),
    (28, 84),
    (36, 44),
    (51, 67),
    (71, 91),
    (80, 100),
];

/// Result of moving one token by one roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The roll would pass square 100; the token stays put.
    Overshoot { at: u8 },
    Step { to: u8 },
    Ladder { landed: u8, to: u8 },
    Snake { landed: u8, to: u8 },
}

impl MoveOutcome {
    /// Square the token ends the turn on.
    pub fn position(&self) -> u8 {
        match *self {
            MoveOutcome::Overshoot { at } => at,
            MoveOutcome::Step { to }
            | MoveOutcome::Ladder { to, .. }
            | MoveOutcome::Snake { to, .. } => to,
        }
    }

    pub fn moved(&self) -> bool {
        !matches!(self, MoveOutcome::Overshoot { .. })
    }

    pub fn is_win(&self) -> bool {
        self.position() == FINAL_SQUARE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    snakes: BTreeMap<u8, u8>,
    ladders: BTreeMap<u8, u8>,
}

impl Board {
    pub fn standard() -> Self {
        Self {
            snakes: SNAKES.into_iter().collect(),
            ladders: LADDERS.into_iter().collect(),
        }
    }

    /// Builds a board from custom jump tables, rejecting tables that would
    /// make a snake climb, a ladder descend, or a square carry two jumps.
    pub fn new(
        snakes: impl IntoIterator<Item = (u8, u8)>,
        ladders: impl IntoIterator<Item = (u8, u8)>,
    ) -> Result<Self, GameError> {
        let snakes: BTreeMap<u8, u8> = snakes.into_iter().collect();
        let ladders: BTreeMap<u8, u8> = ladders.into_iter().collect();

        for (&head, &tail) in &snakes {
            check_square(head)?;
            check_square(tail)?;
            if tail >= head {
                return Err(GameError::InvalidBoard(format!(
                    "snake {head}->{tail} does not go down"
                )));
            }
            if head == FINAL_SQUARE {
                return Err(GameError::InvalidBoard("snake on the final square".into()));
            }
        }

        for (&foot, &top) in &ladders {
            check_square(foot)?;
            check_square(top)?;
            if top <= foot {
                return Err(GameError::InvalidBoard(format!(
                    "ladder {foot}->{top} does not go up"
                )));
            }
            if snakes.contains_key(&foot) {
                return Err(GameError::InvalidBoard(format!(
                    "square {foot} is both a snake head and a ladder foot"
                )));
            }
        }

        Ok(Self { snakes, ladders })
    }

    pub fn snakes(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.snakes.iter().map(|(&h, &t)| (h, t))
    }

    pub fn ladders(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.ladders.iter().map(|(&f, &t)| (f, t))
    }

    pub fn resolve(&self, from: u8, roll: u8) -> MoveOutcome {
        let target = u16::from(from) + u16::from(roll);
        if target > u16::from(FINAL_SQUARE) {
            return MoveOutcome::Overshoot { at: from };
        }

        let landed = target as u8;
        if let Some(&to) = self.ladders.get(&landed) {
            MoveOutcome::Ladder { landed, to }
        } else if let Some(&to) = self.snakes.get(&landed) {
            MoveOutcome::Snake { landed, to }
        } else {
            MoveOutcome::Step { to: landed }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_square(square: u8) -> Result<(), GameError> {
    if (1..=FINAL_SQUARE).contains(&square) {
        Ok(())
    } else {
        Err(GameError::InvalidBoard(format!("square {square} is off the board")))
    }
}
