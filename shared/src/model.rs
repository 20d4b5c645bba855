//! Canonical shape of the shared game state.
//!
//! Everything in here is plain serializable data. The host owns the only
//! mutable copy (see `host::authority`); everybody else sees it through a
//! [`Snapshot`](crate::Snapshot).

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board;

/// Session-wide identity of a participant.
///
/// Doubles as the player key for joins, ownership and rent payments. The
/// host's id is also the public game id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Draws a fresh process-unique identity.
    pub fn generate() -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PeerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileKind {
    Start,
    Property,
    Chance,
    Jail,
    Tax,
    Parking,
}

/// A board cell. Only `owner_id` ever changes during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TileKind,
    /// Purchase price for properties, amount due for tax tiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent: Option<i64>,
    /// Colour group, display only. Rent does not depend on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<PeerId>,
}

impl Tile {
    pub fn property(id: usize, name: &str, price: i64, rent: i64, group: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: TileKind::Property,
            price: Some(price),
            rent: Some(rent),
            group: Some(group.to_string()),
            description: None,
            owner_id: None,
        }
    }

    pub fn tax(id: usize, name: &str, amount: i64) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind: TileKind::Tax,
            price: Some(amount),
            rent: None,
            group: None,
            description: Some(format!("Pay ${}", amount)),
            owner_id: None,
        }
    }

    pub fn special(id: usize, name: &str, kind: TileKind, description: Option<&str>) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            price: None,
            rent: None,
            group: None,
            description: description.map(str::to_string),
            owner_id: None,
        }
    }

    pub fn is_owned(&self) -> bool {
        self.owner_id.is_some()
    }
}

/// A participant's economic state. Owned tiles are not stored here, they
/// are derived from tile ownership via [`GameState::properties_of`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub peer_id: PeerId,
    pub name: String,
    /// Assigned by the host on join, whatever the joiner sent.
    pub color: String,
    /// Signed: may dip below zero after a tax or chance fee.
    pub money: i64,
    pub position: usize,
    pub is_jailed: bool,
    pub jail_turns: u32,
}

impl Player {
    pub fn new(peer_id: PeerId, name: impl Into<String>, money: i64) -> Self {
        Self {
            peer_id,
            name: name.into(),
            color: "#000".to_string(),
            money,
            position: 0,
            is_jailed: false,
            jail_turns: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Lobby,
    Playing,
    GameOver,
}

/// The single root of truth replicated from the host to every client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Bumped by the host on every transition so replicas can drop stale
    /// or duplicate snapshots.
    #[serde(default)]
    pub version: u64,
    /// Join order, which is also turn order.
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub tiles: Vec<Tile>,
    pub game_status: GameStatus,
    /// Newest first.
    pub logs: Vec<String>,
    pub dice: (u8, u8),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

impl GameState {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self {
            version: 0,
            players: Vec::new(),
            current_player_index: 0,
            tiles,
            game_status: GameStatus::Lobby,
            logs: vec![board::WELCOME_LOG.to_string()],
            dice: (1, 1),
            winner: None,
        }
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn player(&self, peer_id: &PeerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.peer_id == peer_id)
    }

    pub fn player_index(&self, peer_id: &PeerId) -> Option<usize> {
        self.players.iter().position(|p| &p.peer_id == peer_id)
    }

    pub fn tile(&self, tile_id: usize) -> Option<&Tile> {
        self.tiles.get(tile_id)
    }

    /// Tile ids owned by `peer_id`, in board order.
    pub fn properties_of(&self, peer_id: &PeerId) -> Vec<usize> {
        self.tiles
            .iter()
            .filter(|t| t.owner_id.as_ref() == Some(peer_id))
            .map(|t| t.id)
            .collect()
    }

    pub fn is_turn_of(&self, peer_id: &PeerId) -> bool {
        self.current_player()
            .map_or(false, |p| &p.peer_id == peer_id)
    }

    pub fn total_money(&self) -> i64 {
        self.players.iter().map(|p| p.money).sum()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(board::initial_tiles())
    }
}
