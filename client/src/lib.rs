//! # Game Client Library
//!
//! This library provides the replica participant of a multiplayer
//! board-game session. A client holds a read-only copy of the host's state,
//! forwards every gameplay action to the host and waits for the resulting
//! snapshot instead of predicting it.
//!
//! ## Architecture Overview
//!
//! ### No Local Simulation
//! The client crate does not depend on the host's reducer at all. Rolling
//! dice, moving, paying and buying only ever happen on the host; the client
//! learns about them from the next `SYNC_STATE`.
//!
//! ### Versioned Replica
//! Each snapshot carries a version stamped by the host. The replica only
//! moves forward, so a duplicate or out-of-order snapshot is dropped.
//!
//! ### Landing Follow-ups
//! After every accepted snapshot the client checks whether its own player
//! just moved onto a property. An unowned property produces a quiz offer
//! for the presentation layer; a rival's property produces an automatic
//! rent payment, sent after a short delay.
//!
//! ## Module Organization
//!
//! ### Link Module (`link`)
//! The single TCP link to the host with its reader and writer tasks.
//!
//! ### Replica Module (`replica`)
//! The client's copy of the state and its version check.
//!
//! ### Router Module (`router`)
//! Implements `Dispatch` for clients and turns host messages into replica
//! updates and landing effects.
//!
//! ### Network Module (`network`)
//! The client event loop tying the link, the router and local input
//! together.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//! use shared::GameRules;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let client = Client::connect("127.0.0.1:8080", "Bob", &GameRules::default()).await?;
//!
//!     let (_actions_tx, actions_rx) = mpsc::unbounded_channel();
//!     let (events_tx, _events_rx) = mpsc::unbounded_channel();
//!     client.run(actions_rx, events_tx).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod link;
pub mod network;
pub mod replica;
pub mod router;
