use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait Dice: Send {
    /// Returns a value in `1..=6`.
    fn roll(&mut self) -> u8;
}

/// Deterministic dice; the same seed always produces the same rolls.
#[derive(Clone, Debug)]
pub struct SeededDice {
    inner: ChaCha8Rng,
}

impl SeededDice {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Dice for SeededDice {
    fn roll(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadDice;

impl Dice for ThreadDice {
    fn roll(&mut self) -> u8 {
        rand::thread_rng().gen_range(1..=6)
    }
}

/// Replays a fixed list of rolls, cycling when it runs out.
#[cfg(test)]
pub(crate) struct ScriptedDice {
    rolls: Vec<u8>,
    next: usize,
}

#[cfg(test)]
impl ScriptedDice {
    pub(crate) fn new(rolls: &[u8]) -> Self {
        Self {
            rolls: rolls.to_vec(),
            next: 0,
        }
    }
}

#[cfg(test)]
impl Dice for ScriptedDice {
    fn roll(&mut self) -> u8 {
        let value = self.rolls[self.next % self.rolls.len()];
        self.next += 1;
        value
    }
}
