//! Persistence hook for player relationships.
//!
//! The service keeps everything in memory. [`AccountStore`] is the seam a
//! deployment can implement to persist logins and friend/ignore edits;
//! [`NoopStore`] accepts everything and stores nothing.

use crate::{Player, SessionError};

/// Receives account events from the router.
///
/// # Trait bounds
///
/// `Send + Sync + 'static` because one store is shared by every
/// connection task for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use gameservice_session::{AccountStore, Player, SessionError};
///
/// /// Refuses logins for one reserved name.
/// struct ReservedNames;
///
/// impl AccountStore for ReservedNames {
///     async fn record_login(&self, player: &Player) -> Result<(), SessionError> {
///         if player.name() == "admin" {
///             return Err(SessionError::Store("reserved name".into()));
///         }
///         Ok(())
///     }
///
///     async fn record_relations(&self, _player: &Player) -> Result<(), SessionError> {
///         Ok(())
///     }
/// }
/// ```
pub trait AccountStore: Send + Sync + 'static {
    /// Called when a staged login is confirmed, before the player is
    /// registered. An error refuses the confirmation; the login stays
    /// staged until it expires.
    fn record_login(
        &self,
        player: &Player,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;

    /// Called after the player's friend or ignore list changed.
    fn record_relations(
        &self,
        player: &Player,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;
}

/// Keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl AccountStore for NoopStore {
    async fn record_login(&self, _player: &Player) -> Result<(), SessionError> {
        Ok(())
    }

    async fn record_relations(&self, _player: &Player) -> Result<(), SessionError> {
        Ok(())
    }
}
