//! Sole owner of the mutable game state.
//!
//! `HostAuthority` is the only type in the workspace that holds a
//! `GameState` it can change. Everything it hands out is a [`Snapshot`].

use log::{debug, info, warn};
use rand::rngs::StdRng;
use shared::{Action, GameRules, GameState, Snapshot};

use crate::dice::{Dice, RandomDice};
use crate::reducer::reduce;

pub struct HostAuthority<D: Dice = RandomDice<StdRng>> {
    state: GameState,
    rules: GameRules,
    dice: D,
}

impl HostAuthority {
    pub fn new(rules: GameRules) -> Self {
        Self::with_dice(GameState::default(), rules, RandomDice::from_entropy())
    }
}

impl<D: Dice> HostAuthority<D> {
    pub fn with_dice(state: GameState, rules: GameRules, dice: D) -> Self {
        Self { state, rules, dice }
    }

    /// Runs one action through the reducer.
    ///
    /// Returns the new snapshot when the state changed, with `version`
    /// advanced by one. Silent no-ops return `None` and keep the version.
    /// `SYNC_STATE` is refused: the host produces snapshots, it never
    /// consumes them.
    pub fn apply(&mut self, action: Action) -> Option<Snapshot> {
        if action.is_sync() {
            warn!("Host refused a SYNC_STATE, it is the only snapshot producer");
            return None;
        }

        let tag = action.tag();
        let next = reduce(self.state.clone(), action, &self.rules, &mut self.dice);
        if next == self.state {
            debug!("{} left the state unchanged", tag);
            return None;
        }

        self.state = GameState {
            version: self.state.version + 1,
            ..next
        };
        info!("Applied {} (version {})", tag, self.state.version);
        Some(self.snapshot())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.state.clone())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn version(&self) -> u64 {
        self.state.version
    }
}
