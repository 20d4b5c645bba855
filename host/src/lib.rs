//! # Game Host Library
//!
//! This library provides the authoritative participant of a multiplayer
//! board-game session. The host owns the only mutable copy of the game
//! state, reduces every action submitted by itself or forwarded by clients,
//! and replicates each resulting state to all connected clients as a full
//! snapshot.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Reduction
//! All game rules live in a pure reducer (`reducer::reduce`) that maps a
//! state and an action to the next state. Dice are the only randomness and
//! they are injected through the [`dice::Dice`] trait, so the reducer can be
//! driven deterministically in tests. [`authority::HostAuthority`] wraps the
//! reducer, stamps every real transition with a new version and hands out
//! immutable snapshots.
//!
//! ### Link Management
//! Handles the lifecycle of client links:
//! - Accepting TCP links up to a capacity limit
//! - Remembering which peer joined over which link
//! - Forgetting closed links (there is no reconnection)
//!
//! ### Replication
//! Every transition that changed the state is pushed to every link, in
//! registration order, as a `SYNC_STATE` carrying the whole state. A new
//! link is brought up to date as soon as it is registered. Delivery is best
//! effort: no acknowledgements and no retries.
//!
//! ## Architecture Design
//!
//! ### Single Session Loop
//! One event loop owns the authority and processes link traffic, the host
//! player's own actions and delayed rent payments strictly one at a time.
//! Link readers, link writers and the broadcaster are separate tasks that
//! talk to the loop over unbounded channels, so the game state itself is
//! never behind a lock.
//!
//! ### Line-Delimited JSON
//! Each message on a link is one JSON object on its own line, using the
//! action encoding defined in the `shared` crate.
//!
//! ## Module Organization
//!
//! ### Reducer Module (`reducer`) and Dice Module (`dice`)
//! The game rules and the dice sources they consume.
//!
//! ### Authority Module (`authority`)
//! The single owner of the mutable state and its version counter.
//!
//! ### Session Module (`session`)
//! The host's action router: reduce, broadcast, then look for landings of
//! the host player.
//!
//! ### Link Manager and Broadcast Modules (`link_manager`, `broadcast`)
//! Link bookkeeping and the task that fans snapshots out to links.
//!
//! ### Network Module (`network`)
//! TCP accept loop, per-link reader and writer tasks and the session loop.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use host::network::HostServer;
//! use shared::GameRules;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let server = HostServer::bind("127.0.0.1:8080", "Alice", GameRules::default(), 8).await?;
//!     println!("Game id: {}", server.game_id());
//!
//!     // The host player's own actions go in, state changes come out
//!     let (_actions_tx, actions_rx) = mpsc::unbounded_channel();
//!     let (events_tx, _events_rx) = mpsc::unbounded_channel();
//!     server.run(actions_rx, events_tx).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod authority;
pub mod broadcast;
pub mod dice;
pub mod link_manager;
pub mod network;
pub mod reducer;
pub mod session;
