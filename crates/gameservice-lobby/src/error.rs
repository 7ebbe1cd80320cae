//! Error types for the lobby layer.

use gameservice_protocol::ProtocolError;

/// Numeric lobby error codes, sent back inside a lobby failure envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LobbyErrorCode {
    UnknownError = 0,
    GameNotAllowed = 2,
    AlreadyInGroup = 11,
    NotInGroup = 13,
}

impl LobbyErrorCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Errors that can occur during lobby operations.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The requested game is not in the supported-games catalogue.
    #[error("game {0:?} is not supported")]
    GameNotAllowed(String),

    /// The player already joined a lobby.
    #[error("already in the {0} lobby")]
    AlreadyInLobby(String),

    /// A logout arrived without a prior lobby login.
    #[error("not in a lobby")]
    NotInLobby,

    /// The request arguments do not have the expected shape.
    #[error("malformed lobby request: {0}")]
    Malformed(#[from] ProtocolError),
}

impl LobbyError {
    /// The code reported to the client.
    pub fn code(&self) -> LobbyErrorCode {
        match self {
            Self::GameNotAllowed(_) => LobbyErrorCode::GameNotAllowed,
            Self::AlreadyInLobby(_) => LobbyErrorCode::AlreadyInGroup,
            Self::NotInLobby => LobbyErrorCode::NotInGroup,
            Self::Malformed(_) => LobbyErrorCode::UnknownError,
        }
    }
}
