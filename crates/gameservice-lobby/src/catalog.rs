//! The sorted set of games a lobby login may name.

/// Supported game identifiers, kept sorted and deduplicated so lookups
/// are a binary search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameCatalog {
    games: Vec<String>,
}

impl GameCatalog {
    pub fn new<I, S>(games: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut games: Vec<String> = games.into_iter().map(Into::into).collect();
        games.sort();
        games.dedup();
        Self { games }
    }

    /// Exact, case-sensitive match.
    pub fn contains(&self, game: &str) -> bool {
        self.games
            .binary_search_by(|entry| entry.as_str().cmp(game))
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.games.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_GAMES;

    #[test]
    fn test_games_are_sorted() {
        let catalog = GameCatalog::new(DEFAULT_GAMES);
        let games: Vec<&str> = catalog.iter().collect();
        assert_eq!(
            games,
            vec![
                "HEROES_5",
                "SPLINTERCELL3PC",
                "SPLINTERCELL3PCADVERS",
                "SPLINTERCELL3PCCOOP",
                "SPLINTERCELL3PS2US",
            ]
        );
    }

    #[test]
    fn test_contains_every_configured_game() {
        let catalog = GameCatalog::new(DEFAULT_GAMES);
        for game in DEFAULT_GAMES {
            assert!(catalog.contains(game), "{game} missing");
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        let catalog = GameCatalog::new(["HEROES_5"]);
        assert!(!catalog.contains("heroes_5"));
        assert!(!catalog.contains("HEROES"));
        assert!(!catalog.contains(""));
    }

    #[test]
    fn test_duplicates_collapse() {
        let catalog = GameCatalog::new(["B", "A", "B"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_empty_catalog_rejects_everything() {
        let catalog = GameCatalog::default();
        assert!(catalog.is_empty());
        assert!(!catalog.contains("HEROES_5"));
    }
}
