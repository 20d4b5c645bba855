//! Immutable snapshots of the authoritative state.

use std::ops::Deref;
use std::sync::Arc;

use crate::model::GameState;
use crate::protocol::Action;

/// Read-only view of one authoritative state.
///
/// Derefs to `&GameState` and offers no way to mutate it; replicas move
/// forward only by swapping in a newer snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Arc<GameState>);

impl Snapshot {
    pub fn new(state: GameState) -> Self {
        Self(Arc::new(state))
    }

    pub fn version(&self) -> u64 {
        self.0.version
    }

    /// Builds the `SYNC_STATE` message that replicates this snapshot.
    pub fn to_sync_action(&self) -> Action {
        Action::SyncState(Box::new(GameState::clone(&self.0)))
    }
}

impl Deref for Snapshot {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        &self.0
    }
}

impl From<GameState> for Snapshot {
    fn from(state: GameState) -> Self {
        Self::new(state)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(GameState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_action_matches_snapshot() {
        let mut state = GameState::default();
        state.version = 3;
        let snapshot = Snapshot::new(state.clone());

        assert_eq!(snapshot.version(), 3);
        match snapshot.to_sync_action() {
            Action::SyncState(payload) => assert_eq!(*payload, state),
            other => panic!("Unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_clones_share_state() {
        let snapshot = Snapshot::default();
        let other = snapshot.clone();
        assert!(std::ptr::eq(&*snapshot, &*other));
    }
}
