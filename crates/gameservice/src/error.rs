//! Unified error type for the game service router.

use gameservice_lobby::LobbyError;
use gameservice_protocol::ProtocolError;
use gameservice_session::{HandshakeError, SessionError};
use gameservice_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Only transport and protocol errors end a connection. The others are
/// domain errors that handlers turn into failure replies; they appear
/// here so callers embedding the router deal with a single type.
#[derive(Debug, thiserror::Error)]
pub enum GameServiceError {
    /// A transport-level error (bind, accept, send, recv, framing).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A payload could not be decrypted, decoded or encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session, registry or pending-login error.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A key exchange step failed.
    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    /// A lobby operation was refused.
    #[error(transparent)]
    Lobby(#[from] LobbyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ReceiveFailed(ProtocolError::FrameTooSmall { size: 2 });
        let converted: GameServiceError = err.into();
        assert!(matches!(converted, GameServiceError::Transport(_)));
        assert!(converted.to_string().contains("receive failed"));
    }

    #[test]
    fn test_from_protocol_error() {
        let converted: GameServiceError = ProtocolError::MissingKey.into();
        assert!(matches!(converted, GameServiceError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let converted: GameServiceError = SessionError::NameTaken("alice".into()).into();
        assert!(matches!(converted, GameServiceError::Session(_)));
        assert!(converted.to_string().contains("alice"));
    }

    #[test]
    fn test_from_handshake_error() {
        let converted: GameServiceError = HandshakeError::OutOfOrder.into();
        assert!(matches!(converted, GameServiceError::Handshake(_)));
    }

    #[test]
    fn test_from_lobby_error() {
        let converted: GameServiceError = LobbyError::NotInLobby.into();
        assert!(matches!(converted, GameServiceError::Lobby(_)));
    }
}
