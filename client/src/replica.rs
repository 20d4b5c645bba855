//! The client's versioned copy of the host's state.
//!
//! Snapshots only ever move the replica forward: a duplicate or an older
//! version is dropped, so reordered or repeated `SYNC_STATE` messages are
//! harmless.

use log::debug;
use shared::{GameState, Snapshot};

/// The client's read-only copy of the host's state.
///
/// The only way to change it is to hand it a newer snapshot from the host.
#[derive(Debug, Default)]
pub struct Replica {
    snapshot: Snapshot,
    synced: bool,
}

impl Replica {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the replica with `state` unless it is older than, or the
    /// same version as, what is already held.
    ///
    /// The first snapshot is always accepted.
    pub fn apply_sync(&mut self, state: GameState) -> bool {
        if self.synced && state.version <= self.snapshot.version() {
            debug!(
                "Ignoring snapshot {} (holding {})",
                state.version,
                self.snapshot.version()
            );
            return false;
        }
        self.snapshot = Snapshot::new(state);
        self.synced = true;
        true
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn state(&self) -> &GameState {
        &self.snapshot
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{GameStatus, Player};

    fn state(version: u64) -> GameState {
        let mut state = GameState::default();
        state.version = version;
        state
    }

    #[test]
    fn test_replica_starts_unsynced() {
        let replica = Replica::new();
        assert!(!replica.is_synced());
        assert_eq!(replica.state().game_status, GameStatus::Lobby);
    }

    #[test]
    fn test_replica_equals_payload() {
        let mut replica = Replica::new();
        let mut payload = state(3);
        payload.players.push(Player::new("p1".into(), "Alice", 1500));
        payload.logs.push("Alice joined the game.".to_string());

        assert!(replica.apply_sync(payload.clone()));
        assert_eq!(replica.state(), &payload);
    }

    #[test]
    fn test_first_snapshot_always_accepted() {
        let mut replica = Replica::new();
        assert!(replica.apply_sync(state(0)));
        assert!(replica.is_synced());
    }

    #[test]
    fn test_stale_and_duplicate_versions_ignored() {
        let mut replica = Replica::new();
        assert!(replica.apply_sync(state(5)));
        assert!(!replica.apply_sync(state(5)));
        assert!(!replica.apply_sync(state(4)));
        assert_eq!(replica.state().version, 5);

        assert!(replica.apply_sync(state(6)));
        assert_eq!(replica.snapshot().version(), 6);
    }
}
