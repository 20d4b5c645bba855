//! The host's action router.
//!
//! Local submissions and actions forwarded by client links both end up in
//! [`HostSession::apply`], which reduces them in arrival order, queues the
//! resulting snapshot for the broadcaster and lets the host player's own
//! landing watcher look at it.

use log::{error, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{
    Action, Dispatch, DispatchError, GameRules, LandingEffect, LandingWatcher, PeerId,
    SessionIdentity, Snapshot,
};
use tokio::sync::mpsc;

use crate::authority::HostAuthority;
use crate::broadcast::GameMessage;
use crate::dice::{Dice, RandomDice};

pub struct HostSession<D: Dice = RandomDice<StdRng>> {
    identity: SessionIdentity,
    authority: HostAuthority<D>,
    watcher: LandingWatcher,
    rng: StdRng,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    landing_effects: Vec<LandingEffect>,
}

impl HostSession {
    pub fn new(
        own_id: PeerId,
        rules: GameRules,
        game_tx: mpsc::UnboundedSender<GameMessage>,
    ) -> Self {
        Self::with_authority(
            own_id,
            HostAuthority::new(rules),
            StdRng::from_entropy(),
            game_tx,
        )
    }
}

impl<D: Dice> HostSession<D> {
    /// `rng` drives quiz question selection for the host player.
    pub fn with_authority(
        own_id: PeerId,
        authority: HostAuthority<D>,
        rng: StdRng,
        game_tx: mpsc::UnboundedSender<GameMessage>,
    ) -> Self {
        let watcher = LandingWatcher::new(own_id.clone(), authority.rules());
        Self {
            identity: SessionIdentity::host(own_id),
            authority,
            watcher,
            rng,
            game_tx,
            landing_effects: Vec::new(),
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn rules(&self) -> &GameRules {
        self.authority.rules()
    }

    /// Reduces one action and replicates the result if anything changed.
    pub fn apply(&mut self, action: Action) -> Option<Snapshot> {
        let snapshot = self.authority.apply(action)?;

        if let Err(e) = self.game_tx.send(GameMessage::Broadcast(snapshot.clone())) {
            error!("Failed to queue snapshot {}: {}", snapshot.version(), e);
        }

        if let Some(effect) = self.watcher.observe(&snapshot, &mut self.rng) {
            self.landing_effects.push(effect);
        }
        Some(snapshot)
    }

    /// Entry point for actions read from a client link.
    pub fn handle_link_action(&mut self, link_id: u32, action: Action) -> Option<Snapshot> {
        if action.is_sync() {
            warn!("Ignoring SYNC_STATE from link {}", link_id);
            return None;
        }
        self.apply(action)
    }

    /// Landing effects for the host player gathered since the last call.
    pub fn take_landing_effects(&mut self) -> Vec<LandingEffect> {
        std::mem::take(&mut self.landing_effects)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.authority.snapshot()
    }

    pub fn version(&self) -> u64 {
        self.authority.version()
    }
}

impl<D: Dice> Dispatch for HostSession<D> {
    fn dispatch(&mut self, action: Action) -> Result<(), DispatchError> {
        if action.is_sync() {
            return Err(DispatchError::ReplicationOnly(action.tag()));
        }
        self.apply(action);
        Ok(())
    }
}
