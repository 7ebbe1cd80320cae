//! Lobby configuration.

use serde::{Deserialize, Serialize};

/// Games a fresh install accepts lobby logins for.
pub const DEFAULT_GAMES: [&str; 5] = [
    "SPLINTERCELL3PCADVERS",
    "SPLINTERCELL3PCCOOP",
    "SPLINTERCELL3PS2US",
    "SPLINTERCELL3PC",
    "HEROES_5",
];

// ---------------------------------------------------------------------------
// LobbyConfig
// ---------------------------------------------------------------------------

/// Settings for the lobby layer.
///
/// Missing fields fall back to [`LobbyConfig::default`] when deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyConfig {
    /// Game identifiers clients may join a lobby for. Order does not
    /// matter; the catalogue sorts them.
    pub supported_games: Vec<String>,

    /// Message of the day served on `NEWS` requests.
    pub motd: String,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            supported_games: DEFAULT_GAMES.iter().map(|g| g.to_string()).collect(),
            motd: "Welcome to the game service".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists_all_known_games() {
        let config = LobbyConfig::default();
        assert_eq!(config.supported_games.len(), 5);
        assert!(config.supported_games.iter().any(|g| g == "HEROES_5"));
        assert!(!config.motd.is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: LobbyConfig = serde_json::from_str(r#"{"motd":"hi"}"#).unwrap();
        assert_eq!(config.motd, "hi");
        assert_eq!(config.supported_games.len(), 5);
    }

    #[test]
    fn test_games_override() {
        let config: LobbyConfig =
            serde_json::from_str(r#"{"supported_games":["RAVENSHIELD"]}"#).unwrap();
        assert_eq!(config.supported_games, vec!["RAVENSHIELD"]);
    }
}
