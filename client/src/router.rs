//! The client's action router.
//!
//! Gameplay actions are never applied locally: they go to the host, and the
//! replica only changes when the host's next snapshot comes back.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{
    Action, Dispatch, DispatchError, GameRules, LandingEffect, LandingWatcher, PeerId,
    SessionIdentity, Snapshot,
};

use crate::link::HostLink;
use crate::replica::Replica;

pub struct ClientRouter {
    identity: SessionIdentity,
    link: HostLink,
    replica: Replica,
    watcher: LandingWatcher,
    rng: StdRng,
    landing_effects: Vec<LandingEffect>,
}

impl ClientRouter {
    pub fn new(own_id: PeerId, game_id: Option<PeerId>, link: HostLink, rules: &GameRules) -> Self {
        Self::with_rng(own_id, game_id, link, rules, StdRng::from_entropy())
    }

    /// `rng` drives quiz question selection.
    pub fn with_rng(
        own_id: PeerId,
        game_id: Option<PeerId>,
        link: HostLink,
        rules: &GameRules,
        rng: StdRng,
    ) -> Self {
        Self {
            watcher: LandingWatcher::new(own_id.clone(), rules),
            identity: SessionIdentity::client(own_id, game_id),
            link,
            replica: Replica::new(),
            rng,
            landing_effects: Vec::new(),
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn replica(&self) -> &Replica {
        &self.replica
    }

    /// Handles one action read from the host link.
    ///
    /// Returns the new snapshot when the replica was replaced.
    pub fn on_link_action(&mut self, action: Action) -> Option<Snapshot> {
        let state = match action {
            Action::SyncState(state) => *state,
            other => {
                warn!("Ignoring {} from host, only SYNC_STATE is expected", other.tag());
                return None;
            }
        };

        if !self.replica.apply_sync(state) {
            return None;
        }
        let snapshot = self.replica.snapshot();
        debug!("Replica now at version {}", snapshot.version());

        if let Some(effect) = self.watcher.observe(&snapshot, &mut self.rng) {
            self.landing_effects.push(effect);
        }
        Some(snapshot)
    }

    /// Landing effects for the local player gathered since the last call.
    pub fn take_landing_effects(&mut self) -> Vec<LandingEffect> {
        std::mem::take(&mut self.landing_effects)
    }
}

impl Dispatch for ClientRouter {
    fn dispatch(&mut self, action: Action) -> Result<(), DispatchError> {
        if action.is_sync() {
            return Err(DispatchError::ReplicationOnly(action.tag()));
        }
        self.link.send(&action)
    }
}
