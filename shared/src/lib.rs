//! Types and logic shared by the host and its clients: the replicated
//! state model, the static board, session rules, the wire protocol and the
//! landing orchestrator that both roles run over the states they observe.

pub mod board;
pub mod console;
pub mod dispatch;
pub mod landing;
pub mod model;
pub mod protocol;
pub mod rules;
pub mod snapshot;
pub mod transport;

pub use board::{Question, PLAYER_COLORS, QUESTIONS, WELCOME_LOG};
pub use dispatch::{Dispatch, DispatchError, Role, SessionEvent, SessionIdentity};
pub use landing::{LandingEffect, LandingWatcher, QuizOffer, QuizOutcome};
pub use model::{GameState, GameStatus, PeerId, Player, Tile, TileKind};
pub use protocol::{decode_line, encode_line, Action, ProtocolError};
pub use rules::{ConfigError, GameRules};
pub use snapshot::Snapshot;
pub use transport::{deliver_after, pump_outbound, read_actions};
