//! Lobby layer for the game service.
//!
//! Lobby traffic rides inside `LOBBY_MSG` frames and is multiplexed by a
//! sub-type. This crate owns the sub-type catalogue, the reply envelopes,
//! and the rules for joining and leaving a game's lobby.
//!
//! # Key types
//!
//! - [`Lobby`]: join/leave rules, supported games, message of the day
//! - [`GameCatalog`]: sorted supported-games list
//! - [`LobbyRequest`] / [`LobbyMessageType`]: parsed `LOBBY_MSG` payloads
//! - [`LobbyConfig`]: lobby settings

mod catalog;
mod config;
mod error;
mod lobby;
pub mod message;

pub use catalog::GameCatalog;
pub use config::{DEFAULT_GAMES, LobbyConfig};
pub use error::{LobbyError, LobbyErrorCode};
pub use lobby::Lobby;
pub use message::{LobbyMessageType, LobbyRequest};
