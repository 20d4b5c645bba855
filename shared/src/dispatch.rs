//! The single entry point through which a participant submits actions.
//!
//! Whether an action is reduced locally or forwarded depends on the
//! participant's [`Role`]; callers only ever see [`Dispatch`].

use crate::landing::LandingEffect;
use crate::model::PeerId;
use crate::protocol::{Action, ProtocolError};
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Owns the authoritative state. Its own id is the game id.
    Host,
    /// Holds a replica and one link to the host identified by `game_id`.
    Client { game_id: Option<PeerId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub own_id: PeerId,
    pub role: Role,
}

impl SessionIdentity {
    pub fn host(own_id: PeerId) -> Self {
        Self {
            own_id,
            role: Role::Host,
        }
    }

    pub fn client(own_id: PeerId, game_id: Option<PeerId>) -> Self {
        Self {
            own_id,
            role: Role::Client { game_id },
        }
    }

    pub fn is_host(&self) -> bool {
        matches!(self.role, Role::Host)
    }

    /// The id clients use to find the session, if known.
    pub fn game_id(&self) -> Option<&PeerId> {
        match &self.role {
            Role::Host => Some(&self.own_id),
            Role::Client { game_id } => game_id.as_ref(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("link to host is closed")]
    LinkClosed,
    #[error("{0} is replication-only and cannot be dispatched")]
    ReplicationOnly(&'static str),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// What a running session reports to the presentation layer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged(Snapshot),
    Landing(LandingEffect),
    Disconnected,
}

pub trait Dispatch {
    /// Submits one action. Success means "applied" on the host and
    /// "queued for the host" on a client.
    fn dispatch(&mut self, action: Action) -> Result<(), DispatchError>;
}
