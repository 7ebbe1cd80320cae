//! The process-wide registry of logged-in players.

use std::sync::atomic::{AtomicU32, Ordering};

use gameservice_protocol::PlayerId;
use tokio::sync::Mutex;

use crate::{Player, PlayerCollection, SessionError};

/// All logged-in players, shared by every connection task.
///
/// One mutex guards the whole collection; lookups return cloned
/// snapshots so no lock outlives a call.
pub struct PlayerRegistry {
    players: Mutex<PlayerCollection>,
    next_id: AtomicU32,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self {
            players: Mutex::new(PlayerCollection::new()),
            next_id: AtomicU32::new(1),
        }
    }

    /// Hands out a fresh player id. Ids are never reused.
    pub fn next_id(&self) -> PlayerId {
        PlayerId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a player.
    ///
    /// # Errors
    /// [`SessionError::NameTaken`] if a live player already has the name.
    pub async fn add(&self, player: Player) -> Result<(), SessionError> {
        let id = player.id();
        let name = player.name().to_owned();
        self.players.lock().await.add(player)?;
        tracing::info!(%id, %name, "player registered");
        Ok(())
    }

    /// Unregisters a player. Unknown ids are ignored.
    pub async fn remove(&self, id: PlayerId) -> Option<Player> {
        let removed = self.players.lock().await.remove(id);
        if let Some(player) = &removed {
            tracing::info!(%id, name = %player.name(), "player unregistered");
        }
        removed
    }

    pub async fn by_id(&self, id: PlayerId) -> Option<Player> {
        self.players.lock().await.get(id).cloned()
    }

    pub async fn by_name(&self, name: &str) -> Option<Player> {
        self.players.lock().await.by_name(name).cloned()
    }

    pub async fn contains_name(&self, name: &str) -> bool {
        self.players.lock().await.contains_name(name)
    }

    pub async fn all(&self) -> Vec<Player> {
        self.players.lock().await.all()
    }

    pub async fn by_game(&self, game: &str) -> Vec<Player> {
        self.players.lock().await.by_game(game)
    }

    pub async fn count(&self) -> usize {
        self.players.lock().await.len()
    }

    /// Runs `f` against the live record while holding the lock.
    ///
    /// # Errors
    /// [`SessionError::PlayerNotFound`] if the id is not registered.
    pub async fn update<R>(
        &self,
        id: PlayerId,
        f: impl FnOnce(&mut Player) -> R,
    ) -> Result<R, SessionError> {
        let mut players = self.players.lock().await;
        let player = players.get_mut(id).ok_or(SessionError::PlayerNotFound(id))?;
        Ok(f(player))
    }

    #[cfg(test)]
    async fn indices_agree(&self) -> bool {
        self.players.lock().await.indices_agree()
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
