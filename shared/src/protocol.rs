//! Wire protocol between participants.
//!
//! A link carries [`Action`]s only, one JSON object per line. Clients send
//! gameplay actions to the host; the host answers every transition with a
//! `SYNC_STATE` carrying the full state.

use serde::{Deserialize, Serialize};

use crate::model::{GameState, PeerId, Player};

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The only permitted state mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    JoinGame(Player),
    ResetGame,
    RollDice,
    BuyProperty {
        #[serde(rename = "tileId")]
        tile_id: usize,
    },
    PayRent {
        amount: i64,
        to: PeerId,
    },
    EndTurn,
    /// Replication only, never gameplay intent.
    SyncState(Box<GameState>),
}

impl Action {
    pub fn tag(&self) -> &'static str {
        match self {
            Action::JoinGame(_) => "JOIN_GAME",
            Action::ResetGame => "RESET_GAME",
            Action::RollDice => "ROLL_DICE",
            Action::BuyProperty { .. } => "BUY_PROPERTY",
            Action::PayRent { .. } => "PAY_RENT",
            Action::EndTurn => "END_TURN",
            Action::SyncState(_) => "SYNC_STATE",
        }
    }

    pub fn is_sync(&self) -> bool {
        matches!(self, Action::SyncState(_))
    }
}

/// Serializes an action as a single line, without the trailing newline.
pub fn encode_line(action: &Action) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(action)?)
}

pub fn decode_line(line: &str) -> Result<Action, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }
    Ok(serde_json::from_str(line)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_actions_are_bare_tags() {
        assert_eq!(encode_line(&Action::RollDice).unwrap(), r#"{"type":"ROLL_DICE"}"#);
        assert_eq!(encode_line(&Action::EndTurn).unwrap(), r#"{"type":"END_TURN"}"#);
        assert_eq!(
            encode_line(&Action::ResetGame).unwrap(),
            r#"{"type":"RESET_GAME"}"#
        );
    }

    #[test]
    fn test_decode_buy_property() {
        let action = decode_line(r#"{"type":"BUY_PROPERTY","payload":{"tileId":7}}"#).unwrap();
        assert_eq!(action, Action::BuyProperty { tile_id: 7 });
    }

    #[test]
    fn test_decode_pay_rent() {
        let action =
            decode_line(r#"{"type":"PAY_RENT","payload":{"amount":2,"to":"host-1"}}"#).unwrap();
        match action {
            Action::PayRent { amount, to } => {
                assert_eq!(amount, 2);
                assert_eq!(to.as_str(), "host-1");
            }
            other => panic!("Wrong action after decode: {:?}", other),
        }
    }

    #[test]
    fn test_decode_join_game() {
        let line = r##"{"type":"JOIN_GAME","payload":{"peerId":"p2","name":"Bob","color":"#000","money":1500,"position":0,"isJailed":false,"jailTurns":0}}"##;
        match decode_line(line).unwrap() {
            Action::JoinGame(player) => {
                assert_eq!(player.peer_id.as_str(), "p2");
                assert_eq!(player.name, "Bob");
                assert_eq!(player.money, 1500);
            }
            other => panic!("Wrong action after decode: {:?}", other),
        }
    }

    #[test]
    fn test_sync_state_carries_whole_state() {
        let mut state = GameState::default();
        state.version = 9;
        state.players.push(Player::new("p1".into(), "Ann", 1500));
        state.tiles[1].owner_id = Some("p1".into());

        let line = encode_line(&Action::SyncState(Box::new(state.clone()))).unwrap();
        assert!(!line.contains('\n'));

        match decode_line(&line).unwrap() {
            Action::SyncState(received) => assert_eq!(*received, state),
            other => panic!("Wrong action after decode: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = decode_line(r#"{"type":"TELEPORT"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(decode_line(""), Err(ProtocolError::Empty)));
        assert!(matches!(decode_line("   \r"), Err(ProtocolError::Empty)));
        assert!(decode_line(r#"{"type":"BUY_PROPERTY"#).is_err());
        assert!(decode_line(r#"{"payload":{}}"#).is_err());
    }

    #[test]
    fn test_action_tags() {
        assert_eq!(Action::RollDice.tag(), "ROLL_DICE");
        assert_eq!(Action::BuyProperty { tile_id: 1 }.tag(), "BUY_PROPERTY");
        assert!(Action::SyncState(Box::default()).is_sync());
        assert!(!Action::EndTurn.is_sync());
    }
}
