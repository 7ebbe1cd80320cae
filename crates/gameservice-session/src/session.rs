//! Per-connection session: protocol state, key material, bound player.
//!
//! A session lives exactly as long as its connection. It never owns a
//! [`Player`](crate::Player); once login completes it only remembers the
//! id the registry assigned.

use std::net::SocketAddr;

use gameservice_protocol::{Message, PlayerId, ProtocolError, RawFrame, SymmetricKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::Deserialize;

use crate::SessionError;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long (in seconds) a staged login waits for its wait-module
    /// confirmation before it is discarded.
    ///
    /// Default: 5 seconds.
    pub pending_login_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pending_login_ttl_secs: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where a connection is in the login flow.
///
/// ```text
///   Anonymous ─(kx 1)→ KeyExchanged ─(kx 2)→ AwaitingLogin
///       │                   │                     │
///       └───────────────────┴──(LOGIN)────────────┴─→ PendingConfirmation
///                                                          │
///   any pre-login state ──(LOGINWAITMODULE)──→ LoggedIn ←──┘
///                                               ↕  (lobby login / logout)
///                                           LobbyJoined
///
///   every state ──(close)──→ Disconnected
/// ```
///
/// The wait-module confirmation normally arrives on a second connection,
/// which is why a fresh pre-login session may jump straight to `LoggedIn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    KeyExchanged,
    AwaitingLogin,
    PendingConfirmation,
    LoggedIn,
    LobbyJoined,
    Disconnected,
}

impl SessionState {
    /// True before any login step has been accepted.
    pub fn is_pre_login(self) -> bool {
        matches!(self, Self::Anonymous | Self::KeyExchanged | Self::AwaitingLogin)
    }

    /// True once a player is bound to the session.
    pub fn is_logged_in(self) -> bool {
        matches!(self, Self::LoggedIn | Self::LobbyJoined)
    }

    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Disconnected, _) => false,
            (_, Disconnected) => true,
            (from, KeyExchanged | AwaitingLogin) => from.is_pre_login(),
            (from, PendingConfirmation) => from.is_pre_login(),
            (from, LoggedIn) => {
                from.is_pre_login() || matches!(from, PendingConfirmation | LobbyJoined)
            }
            (LoggedIn, LobbyJoined) => true,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Keys negotiated for one connection.
///
/// The RSA private key and both symmetric keys wipe themselves on drop.
#[derive(Default)]
pub(crate) struct KeyMaterial {
    pub(crate) server_private: Option<RsaPrivateKey>,
    pub(crate) client_public: Option<RsaPublicKey>,
    /// Supplied by the client in phase 2; used in both directions.
    pub(crate) game_key: Option<SymmetricKey>,
    /// Generated here and sent to the client in phase 2.
    pub(crate) server_key: Option<SymmetricKey>,
}

/// The server's record of one open connection.
pub struct Session {
    peer: SocketAddr,
    pub(crate) state: SessionState,
    player: Option<PlayerId>,
    pub(crate) keys: KeyMaterial,
}

impl Session {
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            state: SessionState::Anonymous,
            player: None,
            keys: KeyMaterial::default(),
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The player bound by a completed login, if any.
    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    /// The client-supplied symmetric key, once phase 2 has completed.
    pub fn game_key(&self) -> Option<&SymmetricKey> {
        self.keys.game_key.as_ref()
    }

    /// The server-generated symmetric key, once phase 2 has completed.
    pub fn server_key(&self) -> Option<&SymmetricKey> {
        self.keys.server_key.as_ref()
    }

    /// Moves to `next` if the state machine allows it.
    pub fn transition(&mut self, next: SessionState) -> Result<(), SessionError> {
        if !self.state.can_transition_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(peer = %self.peer, from = ?self.state, to = ?next, "session transition");
        self.state = next;
        Ok(())
    }

    /// Binds a registered player and moves to `LoggedIn`.
    pub fn bind_player(&mut self, id: PlayerId) -> Result<(), SessionError> {
        self.transition(SessionState::LoggedIn)?;
        self.player = Some(id);
        Ok(())
    }

    /// Decrypts and decodes an inbound frame.
    pub fn open(&self, frame: &RawFrame) -> Result<Message, ProtocolError> {
        Message::open(frame, self.keys.game_key.as_ref())
    }

    /// Encodes and encrypts an outbound message per its own property.
    ///
    /// `GS_ENCRYPT` replies use the client-supplied key, the same one
    /// inbound frames are decrypted with.
    pub fn seal(&self, message: &Message) -> Result<RawFrame, ProtocolError> {
        message.seal(self.keys.game_key.as_ref())
    }

    /// Ends the session: drops all key material and returns the player
    /// that must be removed from the registry.
    pub fn close(&mut self) -> Option<PlayerId> {
        self.state = SessionState::Disconnected;
        self.keys = KeyMaterial::default();
        self.player.take()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("peer", &self.peer)
            .field("state", &self.state)
            .field("player", &self.player)
            .field("encrypted", &self.keys.game_key.is_some())
            .finish()
    }
}
