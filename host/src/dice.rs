//! Sources of randomness for the reducer.
//!
//! Only the host ever rolls. Replicas receive the outcome inside the next
//! snapshot, so the reducer may be non-deterministic without breaking
//! convergence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait Dice {
    /// Two independent faces, each uniform in `1..=6`.
    fn roll(&mut self) -> (u8, u8);
    /// Resolves a chance tile: `true` for the grant, `false` for the fee.
    fn chance_grant(&mut self) -> bool;
}

#[derive(Debug, Clone)]
pub struct RandomDice<R: Rng> {
    rng: R,
}

impl RandomDice<StdRng> {
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomDice<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Dice for RandomDice<R> {
    fn roll(&mut self) -> (u8, u8) {
        (self.rng.gen_range(1..=6), self.rng.gen_range(1..=6))
    }

    fn chance_grant(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Replays a fixed script of rolls and chance outcomes, cycling when it
/// runs out. An empty script rolls `(1, 1)` and always draws the fee.
#[derive(Debug, Clone, Default)]
pub struct LoadedDice {
    rolls: Vec<(u8, u8)>,
    chances: Vec<bool>,
    next_roll: usize,
    next_chance: usize,
}

impl LoadedDice {
    pub fn new(rolls: impl IntoIterator<Item = (u8, u8)>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances = chances.into_iter().collect();
        self
    }
}

impl Dice for LoadedDice {
    fn roll(&mut self) -> (u8, u8) {
        if self.rolls.is_empty() {
            return (1, 1);
        }
        let roll = self.rolls[self.next_roll % self.rolls.len()];
        self.next_roll += 1;
        roll
    }

    fn chance_grant(&mut self) -> bool {
        if self.chances.is_empty() {
            return false;
        }
        let grant = self.chances[self.next_chance % self.chances.len()];
        self.next_chance += 1;
        grant
    }
}
