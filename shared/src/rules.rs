//! Tunable session rules, loadable from a JSON file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read rules file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid rules file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameRules {
    /// Money every player holds after joining or a reset.
    pub starting_money: i64,
    /// Credited when a move wraps past the start tile.
    pub pass_start_bonus: i64,
    pub chance_grant: i64,
    pub chance_fee: i64,
    /// Pause before a landed-on rent is paid automatically.
    pub rent_delay_ms: u64,
    /// Maximum number of log lines kept, `None` keeps everything.
    pub log_capacity: Option<usize>,
    /// Whether RESET_GAME also clears tile ownership from a previous game.
    pub reset_clears_ownership: bool,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_money: 1500,
            pass_start_bonus: 200,
            chance_grant: 50,
            chance_fee: 30,
            rent_delay_ms: 500,
            log_capacity: None,
            reset_clears_ownership: false,
        }
    }
}

impl GameRules {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn rent_delay(&self) -> Duration {
        Duration::from_millis(self.rent_delay_ms)
    }
}
