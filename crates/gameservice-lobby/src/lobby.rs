//! Lobby membership rules applied to a [`Player`].
//!
//! Membership is nothing more than the player's `game` field. The lobby
//! only decides whether a join or leave is allowed and keeps the
//! supported-games catalogue and message of the day.

use gameservice_session::Player;

use crate::{GameCatalog, LobbyConfig, LobbyError};

/// Shared, read-only lobby settings.
#[derive(Debug, Clone)]
pub struct Lobby {
    catalog: GameCatalog,
    motd: String,
}

impl Lobby {
    pub fn new(config: &LobbyConfig) -> Self {
        Self {
            catalog: GameCatalog::new(config.supported_games.iter().cloned()),
            motd: config.motd.clone(),
        }
    }

    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    pub fn motd(&self) -> &str {
        &self.motd
    }

    /// Records `game` as the player's lobby.
    ///
    /// # Errors
    /// - [`LobbyError::GameNotAllowed`]: `game` is not in the catalogue.
    /// - [`LobbyError::AlreadyInLobby`]: the player joined one already.
    pub fn join(&self, player: &mut Player, game: &str) -> Result<(), LobbyError> {
        if !self.catalog.contains(game) {
            return Err(LobbyError::GameNotAllowed(game.to_owned()));
        }
        if let Some(current) = &player.game {
            return Err(LobbyError::AlreadyInLobby(current.clone()));
        }

        player.game = Some(game.to_owned());
        tracing::info!(player = %player.id(), %game, "joined lobby");
        Ok(())
    }

    /// Clears the player's lobby and returns the game it was for.
    pub fn leave(&self, player: &mut Player) -> Result<String, LobbyError> {
        let game = player.game.take().ok_or(LobbyError::NotInLobby)?;
        tracing::info!(player = %player.id(), %game, "left lobby");
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use gameservice_protocol::PlayerId;

    use super::*;

    fn lobby() -> Lobby {
        Lobby::new(&LobbyConfig::default())
    }

    fn alice() -> Player {
        Player::new(PlayerId(1), "alice", "10.0.0.1".parse().unwrap())
    }

    #[test]
    fn test_join_supported_game() {
        let mut p = alice();
        lobby().join(&mut p, "HEROES_5").unwrap();
        assert_eq!(p.game.as_deref(), Some("HEROES_5"));
    }

    #[test]
    fn test_join_unsupported_game() {
        let mut p = alice();
        let err = lobby().join(&mut p, "PONG").unwrap_err();
        assert!(matches!(err, LobbyError::GameNotAllowed(g) if g == "PONG"));
        assert!(p.game.is_none());
    }

    #[test]
    fn test_second_join_rejected() {
        let lobby = lobby();
        let mut p = alice();
        lobby.join(&mut p, "HEROES_5").unwrap();
        let err = lobby.join(&mut p, "SPLINTERCELL3PC").unwrap_err();
        assert!(matches!(err, LobbyError::AlreadyInLobby(_)));
        assert_eq!(p.game.as_deref(), Some("HEROES_5"));
    }

    #[test]
    fn test_leave_then_rejoin() {
        let lobby = lobby();
        let mut p = alice();
        lobby.join(&mut p, "HEROES_5").unwrap();
        assert_eq!(lobby.leave(&mut p).unwrap(), "HEROES_5");
        assert!(matches!(lobby.leave(&mut p), Err(LobbyError::NotInLobby)));
        lobby.join(&mut p, "SPLINTERCELL3PC").unwrap();
    }

    #[test]
    fn test_motd_comes_from_config() {
        let config = LobbyConfig {
            motd: "maintenance at noon".into(),
            ..LobbyConfig::default()
        };
        assert_eq!(Lobby::new(&config).motd(), "maintenance at noon");
    }
}
