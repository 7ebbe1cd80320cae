//! Players and the dual-indexed collection that holds them.

use std::collections::HashMap;
use std::net::IpAddr;

use gameservice_protocol::PlayerId;

use crate::SessionError;

/// Optional profile fields sent with `LOGIN`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub firstname: String,
    pub surname: String,
    pub country: String,
    pub email: String,
    /// Whether other players may read this profile.
    pub public: bool,
}

/// A logged-in (or provisionally staged) player.
///
/// `id` and `name` are the collection keys and cannot be changed after
/// construction; everything else is free to mutate in place.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    pub address: IpAddr,
    pub version: String,
    pub profile: Profile,
    /// Game of the lobby the player joined, if any.
    pub game: Option<String>,
    pub friend_status: String,
    pub friend_mood: String,
    pub friends: PlayerCollection,
    pub ignored: PlayerCollection,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, address: IpAddr) -> Self {
        Self {
            id,
            name: name.into(),
            address,
            version: String::new(),
            profile: Profile::default(),
            game: None,
            friend_status: String::new(),
            friend_mood: String::new(),
            friends: PlayerCollection::default(),
            ignored: PlayerCollection::default(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A copy suitable for another player's friend or ignore list:
    /// identity and profile only, no relations of its own.
    pub fn as_contact(&self) -> Player {
        Player {
            friends: PlayerCollection::default(),
            ignored: PlayerCollection::default(),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerCollection
// ---------------------------------------------------------------------------

/// Players indexed by id and by name.
///
/// Both indices are updated inside the same `&mut self` call, so a
/// collection can never hold an id without its name or the reverse.
#[derive(Debug, Clone, Default)]
pub struct PlayerCollection {
    by_id: HashMap<PlayerId, Player>,
    by_name: HashMap<String, PlayerId>,
}

impl PlayerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a player.
    ///
    /// # Errors
    /// [`SessionError::NameTaken`] or [`SessionError::IdTaken`] if either
    /// key is already present; the collection is left unchanged.
    pub fn add(&mut self, player: Player) -> Result<(), SessionError> {
        if self.by_name.contains_key(&player.name) {
            return Err(SessionError::NameTaken(player.name));
        }
        if self.by_id.contains_key(&player.id) {
            return Err(SessionError::IdTaken(player.id));
        }

        self.by_name.insert(player.name.clone(), player.id);
        self.by_id.insert(player.id, player);
        Ok(())
    }

    /// Removes a player by id. Absent ids are a no-op.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let player = self.by_id.remove(&id)?;
        self.by_name.remove(&player.name);
        Some(player)
    }

    pub fn remove_by_name(&mut self, name: &str) -> Option<Player> {
        let id = self.by_name.get(name).copied()?;
        self.remove(id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.by_id.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.by_id.get_mut(&id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Player> {
        self.by_name.get(name).and_then(|id| self.by_id.get(id))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All players, ordered by id.
    pub fn all(&self) -> Vec<Player> {
        let mut players: Vec<Player> = self.by_id.values().cloned().collect();
        players.sort_by_key(Player::id);
        players
    }

    /// Players whose current lobby game is `game`, ordered by id.
    pub fn by_game(&self, game: &str) -> Vec<Player> {
        let mut players: Vec<Player> = self
            .by_id
            .values()
            .filter(|p| p.game.as_deref() == Some(game))
            .cloned()
            .collect();
        players.sort_by_key(Player::id);
        players
    }

    /// Sorted names, for list replies.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn indices_agree(&self) -> bool {
        self.by_id.len() == self.by_name.len()
            && self
                .by_name
                .iter()
                .all(|(name, id)| self.by_id.get(id).is_some_and(|p| &p.name == name))
    }
}
