//! Error types for the session layer.

use std::net::IpAddr;

use gameservice_protocol::PlayerId;

use crate::SessionState;

/// Errors raised by session, registry and pending-login operations.
///
/// These are domain errors: the router turns them into a failure reply
/// and keeps the connection open.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A player with this name is already registered or pending.
    #[error("name {0:?} is already in use")]
    NameTaken(String),

    /// A player with this id is already registered.
    #[error("player {0} is already registered")]
    IdTaken(PlayerId),

    /// No registered player has this id.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// No pending login exists for this address (never staged, or expired).
    #[error("no pending login from {0}")]
    PendingNotFound(IpAddr),

    /// A pending login exists for the address, but under another name.
    #[error("pending login is for {expected:?}, not {got:?}")]
    PendingNameMismatch { expected: String, got: String },

    /// The session state machine does not allow this step.
    #[error("invalid session transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },

    /// The account store rejected an operation.
    #[error("account store: {0}")]
    Store(String),
}
